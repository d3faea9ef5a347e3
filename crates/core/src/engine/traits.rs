//! Trait definitions for the engine module.

use async_trait::async_trait;
use std::fmt;

use super::args::ArgumentList;
use super::error::EngineError;

/// How an engine process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineExit {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl EngineExit {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for EngineExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for EngineExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exited with status {}", code),
            None => f.write_str("was terminated by a signal"),
        }
    }
}

/// Something that can start engine processes.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Returns the name used in log lines.
    fn name(&self) -> &str;

    /// Starts one engine process with the given arguments.
    ///
    /// Fails with a launch error when the engine could not run at all; that is
    /// never counted as a download attempt.
    async fn spawn(&self, args: &ArgumentList) -> Result<Box<dyn EngineProcess>, EngineError>;
}

/// A running engine process.
///
/// Read output with [`next_line`](Self::next_line) until it returns `None`,
/// then call [`wait`](Self::wait). Dropping the process at any point releases
/// it, terminating the child if it is still running.
#[async_trait]
pub trait EngineProcess: Send {
    /// Next line of merged stdout/stderr, or `None` once the output closes.
    async fn next_line(&mut self) -> Result<Option<String>, EngineError>;

    /// Waits for the process to exit.
    async fn wait(&mut self) -> Result<EngineExit, EngineError>;
}
