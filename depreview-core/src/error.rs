//! Error types for depreview

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for depreview operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for depreview operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No loader matched the configured identifier
    #[error("Loader '{identifier}' not found (searched: {})", display_paths(.searched))]
    LoaderNotFound {
        identifier: String,
        searched: Vec<PathBuf>,
    },

    /// A git subprocess failed
    #[error("Git error: {0}")]
    Git(String),

    /// A dependency manifest could not be loaded
    #[error("Failed to load {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// Owner resolution failed
    #[error("Owner resolution error: {0}")]
    Resolve(String),

    /// Requesting reviewers failed
    #[error("Review request error: {0}")]
    Review(String),
}

impl Error {
    /// Build a load error for the given manifest
    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "built-in loaders only".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
