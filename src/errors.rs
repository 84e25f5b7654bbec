//! Shared error types for the generation engine.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fakesmith operations.
///
/// Only output I/O failures and model-contract violations are fatal; cache
/// defects are handled as misses and unresolvable types always resolve to a
/// fallback expression, so neither surfaces here.
#[derive(Debug, Error)]
pub enum Error {
    /// Output I/O failure, always fatal for the current pass.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Programmer-level model contract violation (e.g. duplicate members).
    #[error("Model error: {0}")]
    Model(String),

    /// Cache operation errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an I/O error identifying the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
