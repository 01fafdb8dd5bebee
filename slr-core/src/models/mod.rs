pub mod document;
pub mod sparse_vector;

// re-export for cleaner imports
pub use self::document::{Document, EncodedDocument};
pub use self::sparse_vector::SparseVector;
