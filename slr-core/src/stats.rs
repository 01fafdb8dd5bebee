use std::ops::Range;

use crate::errors::{Result, SlrError};

/// Posting-list lengths per dimension across a set of documents.
///
/// The length of dimension `i` is the number of observed documents with a
/// nonzero weight at `i`.
#[derive(Debug, Clone)]
pub struct PostingStats {
    lengths: Vec<u64>,
    documents: u64,
}

impl PostingStats {
    pub fn new(dim: usize) -> Self {
        Self {
            lengths: vec![0; dim],
            documents: 0,
        }
    }

    /// Record the support (nonzero dimensions) of one document.
    pub fn observe(&mut self, support: &[u32]) -> Result<()> {
        if let Some(&bad) = support.iter().find(|&&i| i as usize >= self.lengths.len()) {
            return Err(SlrError::MalformedVector(format!(
                "dimension {} is out of range for dimensionality {}",
                bad,
                self.lengths.len()
            )));
        }
        for &i in support {
            self.lengths[i as usize] += 1;
        }
        self.documents += 1;
        Ok(())
    }

    /// Widen to at least `dim` dimensions, for inputs whose dimensionality is
    /// only known once read.
    pub fn ensure_dim(&mut self, dim: usize) {
        if dim > self.lengths.len() {
            self.lengths.resize(dim, 0);
        }
    }

    pub fn documents(&self) -> u64 {
        self.documents
    }

    pub fn dim(&self) -> usize {
        self.lengths.len()
    }

    pub fn lengths(&self) -> &[u64] {
        &self.lengths
    }

    /// `(dimension, length)` pairs, longest posting list first.
    pub fn sorted_lengths(&self) -> Vec<(u32, u64)> {
        let mut sorted: Vec<(u32, u64)> = self
            .lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| (i as u32, len))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        sorted
    }

    /// Mean fraction of documents retaining a dimension in `range`.
    pub fn retention_rate(&self, range: Range<usize>) -> f64 {
        let range = range.start.min(self.dim())..range.end.min(self.dim());
        if range.is_empty() || self.documents == 0 {
            return 0.0;
        }
        let width = range.len() as f64;
        let total: u64 = self.lengths[range].iter().sum();
        total as f64 / (width * self.documents as f64)
    }

    /// Number of dimensions that never appear.
    pub fn zero_postings(&self) -> usize {
        self.lengths.iter().filter(|&&len| len == 0).count()
    }

    pub fn mean_length(&self) -> f64 {
        if self.lengths.is_empty() {
            return 0.0;
        }
        self.lengths.iter().sum::<u64>() as f64 / self.lengths.len() as f64
    }
}
