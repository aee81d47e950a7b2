//! Error types for the harness.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the harness itself (as opposed to failing a single test)
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Test folder {}: {error}", path.display())]
    Folder { path: PathBuf, error: io::Error },
}

impl Error {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }
}
