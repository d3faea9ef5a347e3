//! Top-level error for a download run and its process exit code.

use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::input::InputError;
use crate::orchestrator::{AttemptRecord, OrchestratorError};

/// Exit code for precondition failures.
pub const EXIT_PRECONDITION: i32 = 1;
/// Exit code when every attempt, fallback included, failed.
pub const EXIT_EXHAUSTED: i32 = 2;
/// Exit code after Ctrl+C.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Everything that can stop a download run.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no input given")]
    EmptyInput,

    #[error(transparent)]
    Classification(#[from] InputError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Launch(EngineError),

    #[error("download failed after {} attempts: {reason}", .attempts.len())]
    Terminal {
        reason: String,
        attempts: Vec<AttemptRecord>,
    },

    #[error("interrupted")]
    Interrupted,
}

impl DownloadError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DownloadError::Terminal { .. } => EXIT_EXHAUSTED,
            DownloadError::Interrupted => EXIT_INTERRUPTED,
            DownloadError::EmptyInput
            | DownloadError::Classification(_)
            | DownloadError::Config(_)
            | DownloadError::Launch(_) => EXIT_PRECONDITION,
        }
    }
}

impl From<EngineError> for DownloadError {
    fn from(err: EngineError) -> Self {
        DownloadError::Launch(err)
    }
}

impl From<OrchestratorError> for DownloadError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::Launch(e) => DownloadError::Launch(e),
            OrchestratorError::Exhausted { reason, attempts } => {
                DownloadError::Terminal { reason, attempts }
            }
        }
    }
}
