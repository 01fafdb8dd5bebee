use std::fmt::{self, Display};

use crate::errors::{Result, SlrError};

/// A sparse weight vector over a fixed dimensionality.
///
/// Each retained dimension is an index-value pair. Indices are strictly
/// ascending and every stored weight is finite and positive; sparsity comes
/// from omission, never from stored zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    pub dim: usize,
    pub indices: Vec<u32>,
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a sparse vector, checking every invariant.
    pub fn new(dim: usize, indices: Vec<u32>, values: Vec<f64>) -> Result<Self> {
        if dim == 0 {
            return Err(SlrError::invalid("dim", "dimensionality must be greater than zero"));
        }
        if indices.len() != values.len() {
            return Err(SlrError::invalid(
                "indices",
                format!(
                    "{} indices but {} values",
                    indices.len(),
                    values.len()
                ),
            ));
        }
        if let Some(pair) = indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(SlrError::invalid(
                "indices",
                format!("indices must be strictly ascending, found {} then {}", pair[0], pair[1]),
            ));
        }
        if let Some(&last) = indices.last() {
            if last as usize >= dim {
                return Err(SlrError::invalid(
                    "indices",
                    format!("index {} is out of range for dimensionality {}", last, dim),
                ));
            }
        }
        if let Some(w) = values.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(SlrError::invalid(
                "values",
                format!("weights must be finite and positive, found {}", w),
            ));
        }

        Ok(SparseVector {
            dim,
            indices,
            values,
        })
    }

    /// Build from `(index, weight)` pairs in any order.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(u32, f64)>) -> Result<Self> {
        pairs.sort_by_key(|&(i, _)| i);
        let (indices, values) = pairs.into_iter().unzip();
        SparseVector::new(dim, indices, values)
    }

    /// Build from a dense slice, dropping zeros.
    pub fn from_dense(dense: &[f64]) -> Result<Self> {
        let pairs = dense
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, &v)| (i as u32, v))
            .collect();
        SparseVector::from_pairs(dense.len(), pairs)
    }

    /// Used by the generator, which produces entries in ascending order by construction.
    pub(crate) fn from_sorted_unchecked(dim: usize, indices: Vec<u32>, values: Vec<f64>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(values.iter().all(|&w| w > 0.0));
        SparseVector {
            dim,
            indices,
            values,
        }
    }

    /// Returns the number of non-zero entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Weight at `index`, zero when the dimension was not retained.
    pub fn get(&self, index: u32) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for (i, w) in self.iter() {
            dense[i as usize] = w;
        }
        dense
    }
}

impl Display for SparseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SparseVector with {} of {} dimensions retained.",
            self.len(),
            self.dim
        )
    }
}
