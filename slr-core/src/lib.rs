//!
//! Core library for slr-tools: synthetic sparse lexical representation (SLR)
//! vectors for retrieval experiments.
//!
//! A vector is drawn from a [`RandomSource`] under a [`SparsityMode`], then
//! projected to text with an [`Encoding`] so an ordinary bag-of-words indexer
//! can consume it.
//!
//! ```rust
//! use slr_core::{Encoding, SeededSource, SparseVectorGenerator, SparsityMode};
//!
//! let mode = SparsityMode::Zipfian { exponent: 0.35 };
//! let mut generator = SparseVectorGenerator::new(1000, mode, SeededSource::new(Some(42))).unwrap();
//! let vector = generator.generate();
//! let line = Encoding::repetition(5).unwrap().encode(&vector).unwrap();
//! assert!(vector.indices.iter().all(|&i| (i as usize) < 1000));
//! # let _ = line;
//! ```
pub mod config;
pub mod consts;
pub mod encoding;
pub mod errors;
pub mod generator;
pub mod models;
pub mod random;
pub mod stats;

// re-exports
pub use config::*;
pub use encoding::*;
pub use errors::*;
pub use generator::*;
pub use models::*;
pub use random::*;
pub use stats::*;
