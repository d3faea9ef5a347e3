//! Types for the download orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{EngineError, Profile};

/// Errors that end orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The engine could not be started; no attempt was consumed.
    #[error(transparent)]
    Launch(#[from] EngineError),

    /// Every normal attempt and the fallback attempt failed.
    #[error("all {} attempts failed, last error: {reason}", .attempts.len())]
    Exhausted {
        reason: String,
        attempts: Vec<AttemptRecord>,
    },
}

/// How a single attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    Failed { reason: String },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Succeeded)
    }
}

/// One engine run, kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based; the fallback attempt is numbered after the normal ones.
    pub number: u32,
    pub profile: Profile,
    pub outcome: AttemptOutcome,
    /// Percentage last reported during this attempt.
    pub last_progress: u8,
    pub finished_at: DateTime<Utc>,
}

/// Summary of a successful download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadReport {
    pub attempts: Vec<AttemptRecord>,
    pub final_progress: u8,
    pub used_fallback: bool,
}

impl DownloadReport {
    /// Number of engine processes launched.
    pub fn launches(&self) -> usize {
        self.attempts.len()
    }
}
