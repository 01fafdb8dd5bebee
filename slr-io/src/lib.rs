//!
//! File-facing half of slr-tools: reading corpora for document identifiers,
//! writing encoded documents (single TSV file or rotated batches), and the
//! conversions between those forms.
//!
pub mod consts;
pub mod convert;
pub mod corpus;
pub mod pipeline;
pub mod utils;
pub mod writer;

// re-exports
pub use convert::*;
pub use corpus::*;
pub use pipeline::*;
pub use writer::*;
