use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlrError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("I/O failure on {path:?}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed vector text: {0}")]
    MalformedVector(String),

    #[error("Can't parse config: {0}")]
    ConfigParse(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SlrError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SlrError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SlrError::IoFailure {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = SlrError> = std::result::Result<T, E>;
