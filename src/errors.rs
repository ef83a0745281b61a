//! Error types for preparing a demultiplexing run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemultiplexError {
    /// Argument parsing failed. Help and version requests never end up here.
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("BCL directory does not exist: {0}")]
    MissingBclDirectory(PathBuf),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("Sample sheet does not exist: {0}")]
    MissingSampleSheet(PathBuf),

    #[error("Working directory '{0}' already exists and is not empty. Use --force to overwrite it")]
    WorkingDirectoryExists(PathBuf),

    #[error("Barcode mismatch must be 0, 1 or 2 (got {0})")]
    InvalidBarcodeMismatch(u8),

    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize YAML: {0}")]
    SerializeYaml(#[from] serde_yaml::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializeJson(#[from] serde_json::Error),
}

impl DemultiplexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DemultiplexError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DemultiplexError>;
