use std::fmt::{self, Display};

use crate::errors::{Result, SlrError};
use crate::models::SparseVector;
use crate::random::RandomSource;

/// How retained dimensions are chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SparsityMode {
    /// Keep a sample when it exceeds `threshold`, so roughly `1 - threshold`
    /// of the dimensions survive. `0 <= threshold < 1`.
    Uniform { threshold: f64 },
    /// Keep dimension `i` when its sample falls below `1 / (i+1)^exponent`,
    /// skewing retention toward low indices. `0 < exponent < 1`.
    Zipfian { exponent: f64 },
}

impl SparsityMode {
    pub fn validate(&self) -> Result<()> {
        match *self {
            SparsityMode::Uniform { threshold } => {
                if !(0.0..1.0).contains(&threshold) {
                    return Err(SlrError::invalid(
                        "sparsity_threshold",
                        format!("must satisfy 0 <= threshold < 1, got {}", threshold),
                    ));
                }
            }
            SparsityMode::Zipfian { exponent } => {
                if !(exponent > 0.0 && exponent < 1.0) {
                    return Err(SlrError::invalid(
                        "zipf_param",
                        format!("must lie in (0, 1), got {}", exponent),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Display for SparsityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SparsityMode::Uniform { threshold } => write!(f, "uniform (threshold {})", threshold),
            SparsityMode::Zipfian { exponent } => write!(f, "zipfian (exponent {})", exponent),
        }
    }
}

fn validate_dim(dim: usize) -> Result<()> {
    if dim == 0 {
        return Err(SlrError::invalid("dim", "dimensionality must be greater than zero"));
    }
    if dim > u32::MAX as usize {
        return Err(SlrError::invalid(
            "dim",
            format!("dimensionality must not exceed {}", u32::MAX),
        ));
    }
    Ok(())
}

/// Retention ceilings `1 / (i+1)^exponent` for every dimension.
fn zipf_ceilings(dim: usize, exponent: f64) -> Vec<f64> {
    (0..dim)
        .map(|i| 1.0 / ((i + 1) as f64).powf(exponent))
        .collect()
}

fn sample<S: RandomSource + ?Sized>(
    dim: usize,
    mode: SparsityMode,
    ceilings: Option<&[f64]>,
    source: &mut S,
) -> SparseVector {
    let mut indices = Vec::new();
    let mut values = Vec::new();

    for i in 0..dim {
        let u = source.next_unit();
        let keep = match mode {
            SparsityMode::Uniform { threshold } => u > threshold,
            SparsityMode::Zipfian { exponent } => {
                let ceiling = match ceilings {
                    Some(c) => c[i],
                    None => 1.0 / ((i + 1) as f64).powf(exponent),
                };
                u > 0.0 && u < ceiling
            }
        };
        if keep {
            indices.push(i as u32);
            values.push(u);
        }
    }

    SparseVector::from_sorted_unchecked(dim, indices, values)
}

///
/// Draw one sparse vector of dimensionality `dim`.
///
/// Parameters are validated before the first sample is drawn.
///
/// # Arguments
///
/// - dim: number of dimensions, must be positive
/// - mode: sparsity control
/// - source: uniform sample stream
///
pub fn generate<S: RandomSource + ?Sized>(
    dim: usize,
    mode: SparsityMode,
    source: &mut S,
) -> Result<SparseVector> {
    validate_dim(dim)?;
    mode.validate()?;
    Ok(sample(dim, mode, None, source))
}

/// A validated `(dim, mode, source)` triple producing one vector per call.
pub struct SparseVectorGenerator<S: RandomSource> {
    dim: usize,
    mode: SparsityMode,
    ceilings: Option<Vec<f64>>,
    source: S,
}

impl<S: RandomSource> SparseVectorGenerator<S> {
    pub fn new(dim: usize, mode: SparsityMode, source: S) -> Result<Self> {
        validate_dim(dim)?;
        mode.validate()?;

        let ceilings = match mode {
            SparsityMode::Zipfian { exponent } => Some(zipf_ceilings(dim, exponent)),
            SparsityMode::Uniform { .. } => None,
        };

        Ok(Self {
            dim,
            mode,
            ceilings,
            source,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn mode(&self) -> SparsityMode {
        self.mode
    }

    pub fn generate(&mut self) -> SparseVector {
        sample(
            self.dim,
            self.mode,
            self.ceilings.as_deref(),
            &mut self.source,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedSource, SeededSource};

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn source() -> SeededSource {
        SeededSource::new(Some(42))
    }

    #[rstest]
    #[case(SparsityMode::Uniform { threshold: 0.0 })]
    #[case(SparsityMode::Uniform { threshold: 0.5 })]
    #[case(SparsityMode::Uniform { threshold: 0.99 })]
    #[case(SparsityMode::Zipfian { exponent: 0.35 })]
    #[case(SparsityMode::Zipfian { exponent: 0.9 })]
    fn test_generated_vectors_hold_invariants(mut source: SeededSource, #[case] mode: SparsityMode) {
        for dim in [1, 7, 500] {
            let v = generate(dim, mode, &mut source).unwrap();
            assert!(v.indices.iter().all(|&i| (i as usize) < dim));
            assert!(v.indices.windows(2).all(|w| w[0] < w[1]));
            assert!(v.values.iter().all(|&w| w > 0.0 && w < 1.0));
        }
    }

    #[rstest]
    fn test_uniform_retention_rate(mut source: SeededSource) {
        let v = generate(10_000, SparsityMode::Uniform { threshold: 0.9 }, &mut source).unwrap();
        // expected 1000 retained
        assert!(v.len() > 800 && v.len() < 1200, "retained {}", v.len());
    }

    #[rstest]
    fn test_uniform_drops_values_at_threshold() {
        let mut source = ScriptedSource::new(vec![0.5, 0.50001, 0.2, 0.0]).unwrap();
        let v = generate(4, SparsityMode::Uniform { threshold: 0.5 }, &mut source).unwrap();
        assert_eq!(v.indices, vec![1]);
        assert_eq!(v.values, vec![0.50001]);
    }

    #[rstest]
    fn test_zero_threshold_never_keeps_zero_weight() {
        let mut source = ScriptedSource::new(vec![0.0, 0.4, 0.0, 0.9, 0.0]).unwrap();
        let v = generate(5, SparsityMode::Uniform { threshold: 0.0 }, &mut source).unwrap();
        assert_eq!(v.indices, vec![1, 3]);
        assert_eq!(v.values, vec![0.4, 0.9]);
    }

    #[rstest]
    fn test_zipfian_uses_ceilings() {
        // ceilings for exponent 0.5: 1.0, 0.7071, 0.5774, 0.5
        let mut source = ScriptedSource::new(vec![0.99, 0.75, 0.55, 0.0]).unwrap();
        let v = generate(4, SparsityMode::Zipfian { exponent: 0.5 }, &mut source).unwrap();
        assert_eq!(v.indices, vec![0, 2]);
    }

    #[rstest]
    fn test_zipfian_decays_with_index(source: SeededSource) {
        let dim = 100;
        let trials = 2_000;
        let mut generator =
            SparseVectorGenerator::new(dim, SparsityMode::Zipfian { exponent: 0.5 }, source).unwrap();

        let mut counts = vec![0usize; dim];
        for _ in 0..trials {
            for i in generator.generate().indices {
                counts[i as usize] += 1;
            }
        }

        let first: usize = counts[..10].iter().sum();
        let last: usize = counts[90..].iter().sum();
        assert!(first > last, "first decile {} vs last decile {}", first, last);
        assert!(counts[0] >= counts[dim - 1]);
    }

    #[rstest]
    fn test_generator_matches_free_function() {
        let mode = SparsityMode::Zipfian { exponent: 0.35 };
        let mut generator = SparseVectorGenerator::new(64, mode, SeededSource::new(Some(3))).unwrap();
        let mut source = SeededSource::new(Some(3));
        for _ in 0..4 {
            assert_eq!(generator.generate(), generate(64, mode, &mut source).unwrap());
        }
    }

    #[rstest]
    #[case(0, SparsityMode::Uniform { threshold: 0.5 })]
    #[case(10, SparsityMode::Uniform { threshold: 1.0 })]
    #[case(10, SparsityMode::Uniform { threshold: -0.1 })]
    #[case(10, SparsityMode::Uniform { threshold: f64::NAN })]
    #[case(10, SparsityMode::Zipfian { exponent: 0.0 })]
    #[case(10, SparsityMode::Zipfian { exponent: 1.0 })]
    #[case(10, SparsityMode::Zipfian { exponent: 2.5 })]
    fn test_invalid_parameters(mut source: SeededSource, #[case] dim: usize, #[case] mode: SparsityMode) {
        let result = generate(dim, mode, &mut source);
        assert!(matches!(result, Err(SlrError::InvalidParameter { .. })));
        assert!(SparseVectorGenerator::new(dim, mode, SeededSource::new(None)).is_err());
    }
}
