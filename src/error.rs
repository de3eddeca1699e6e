//! Error types for SPDX 3 document merging

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("{0}")]
    Configuration(String),

    #[error("Failed to load document from {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("Invalid SPDX 3 document {source_name}: {reason}")]
    Format { source_name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to replace output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl MergeError {
    pub(crate) fn format(source_name: &str, reason: impl Into<String>) -> Self {
        MergeError::Format {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}
