//! Crate-level error type

use crate::ir::{ConfigValidationError, LayoutError, LayoutFileError, NameError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by describing or emitting a bundle configuration
#[derive(Debug, Error)]
pub enum PackerError {
    /// Extension name failed validation
    #[error("Invalid extension name: {0}")]
    InvalidName(#[from] NameError),

    /// Layout values are unusable
    #[error("Invalid layout: {0}")]
    InvalidLayout(#[from] LayoutError),

    /// Layout file could not be loaded
    #[error(transparent)]
    LayoutFile(#[from] LayoutFileError),

    /// Configuration breaks a structural invariant
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// Writing an emitted configuration failed
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = PackerError> = std::result::Result<T, E>;
