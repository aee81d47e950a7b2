//! Error types for probe operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while probing the filesystem
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error on {}: {error}", path.display())]
    Io { path: PathBuf, error: io::Error },

    #[error("{tool} is not installed or not on PATH")]
    ToolMissing { tool: String },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Invalid NFSv4 ACE `{text}`: {reason}")]
    InvalidAce { text: String, reason: String },
}

impl ProbeError {
    pub(crate) fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }

    /// The underlying OS error kind, if this error came from an OS call.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { error, .. } => Some(error.kind()),
            _ => None,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::PermissionDenied)
    }

    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }
}
