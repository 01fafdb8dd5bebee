use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::{Result, SlrError};

/// A stream of samples from the continuous uniform distribution on `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Pseudo-random source backed by [`StdRng`].
///
/// A seed makes runs reproducible; without one the generator is seeded from
/// the operating system.
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of samples, wrapping around when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(SlrError::invalid("values", "a scripted source needs at least one value"));
        }
        if let Some(v) = values.iter().find(|v| !(0.0..1.0).contains(*v)) {
            return Err(SlrError::invalid(
                "values",
                format!("scripted samples must lie in [0, 1), found {}", v),
            ));
        }
        Ok(Self { values, cursor: 0 })
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}
