//! Error types for the engine module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while launching or talking to the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine executable does not exist or is not on PATH.
    #[error("aria2c not found at {path}")]
    NotFound { path: PathBuf },

    /// The executable exists but could not be started (permissions, bad binary).
    #[error("Failed to start {path}: {source}")]
    LaunchFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while reading output or waiting for exit.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Maps a spawn error, keeping "not found" distinct from other start failures.
    pub fn from_spawn(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::LaunchFailed { path, source }
        }
    }
}
