use serde::{Deserialize, Serialize};

use crate::models::sparse_vector::SparseVector;

/// A generated document: an identifier paired with its vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub vector: SparseVector,
    /// Original source content, when the document was derived from one.
    pub raw: Option<String>,
}

impl Document {
    pub fn new(id: String, vector: SparseVector) -> Self {
        Self {
            id,
            vector,
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: String) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// Textual projection of a [`Document`], ready to be written.
///
/// Serializes as `{"id": .., "contents": .., "raw": ..}` with `raw` left out
/// when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedDocument {
    pub id: String,
    pub contents: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl EncodedDocument {
    pub fn new(id: String, contents: String) -> Self {
        Self {
            id,
            contents,
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: String) -> Self {
        self.raw = Some(raw);
        self
    }

    /// `<id>\t<contents>`, without a trailing newline.
    pub fn to_tsv_line(&self) -> String {
        format!("{}\t{}", self.id, self.contents)
    }
}
