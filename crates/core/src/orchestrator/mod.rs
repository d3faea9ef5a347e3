//! Download orchestrator: attempt accounting, backoff and fallback.
//!
//! Attempts are strictly sequential. The destination directory and any
//! partial files are shared between attempts, so two engine processes never
//! run at the same time.

mod backoff;
mod config;
mod runner;
mod types;

pub use backoff::{Sleeper, TokioSleeper};
pub use config::RetryConfig;
pub use runner::DownloadOrchestrator;
pub use types::{AttemptOutcome, AttemptRecord, DownloadReport, OrchestratorError};
