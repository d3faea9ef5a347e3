//! Mock engine for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::engine::{ArgumentList, Engine, EngineError, EngineExit, EngineProcess};

/// Name reported by the mock, shows up in failure reasons.
pub const MOCK_ENGINE_NAME: &str = "mock-aria2c";

/// Scripted behavior for one spawn.
#[derive(Debug, Clone)]
pub struct MockRun {
    /// Output lines, delivered in order.
    pub lines: Vec<String>,
    /// Exit status reported by `wait`.
    pub exit: EngineExit,
    /// Fail the spawn itself, as if the binary were missing.
    pub launch_fails: bool,
    /// After the lines, report a read error instead of end of output.
    pub output_error: bool,
}

impl MockRun {
    /// Prints the lines and exits 0.
    pub fn success<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            exit: EngineExit::success(),
            launch_fails: false,
            output_error: false,
        }
    }

    /// Prints the lines and exits with `code`.
    pub fn failure<I, S>(code: i32, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exit: EngineExit::failure(code),
            ..Self::success(lines)
        }
    }

    /// Never starts.
    pub fn launch_failure() -> Self {
        Self {
            launch_fails: true,
            ..Self::success(Vec::<String>::new())
        }
    }

    /// Prints the lines, then the output pipe errors out.
    pub fn broken_output<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output_error: true,
            exit: EngineExit::failure(1),
            ..Self::success(lines)
        }
    }
}

/// Mock implementation of the Engine trait.
///
/// Provides controllable behavior for testing:
/// - Queue scripted runs, consumed one per spawn
/// - Record every argument list it was launched with
/// - Fall back to a default run once the queue is empty
///
/// # Example
///
/// ```rust,ignore
/// use ariapilot_core::testing::{MockEngine, MockRun};
///
/// let engine = MockEngine::new();
/// engine.push_run(MockRun::failure(1, ["(12%)"])).await;
/// engine.push_run(MockRun::success(["(100%)"])).await;
///
/// // run the orchestrator...
///
/// assert_eq!(engine.launch_count().await, 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockEngine {
    /// Runs consumed in order by `spawn`.
    scripted: Arc<RwLock<VecDeque<MockRun>>>,
    /// Used when `scripted` is empty.
    default_run: Arc<RwLock<MockRun>>,
    /// Every argument list passed to `spawn`.
    launches: Arc<RwLock<Vec<ArgumentList>>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// Create a mock engine that succeeds silently unless scripted otherwise.
    pub fn new() -> Self {
        Self {
            scripted: Arc::new(RwLock::new(VecDeque::new())),
            default_run: Arc::new(RwLock::new(MockRun::success(Vec::<String>::new()))),
            launches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue a run for the next unscripted spawn.
    pub async fn push_run(&self, run: MockRun) {
        self.scripted.write().await.push_back(run);
    }

    /// Set the run used once the queue is empty.
    pub async fn set_default_run(&self, run: MockRun) {
        *self.default_run.write().await = run;
    }

    /// Get all recorded argument lists.
    pub async fn launches(&self) -> Vec<ArgumentList> {
        self.launches.read().await.clone()
    }

    /// Get the number of spawns, including ones that failed to launch.
    pub async fn launch_count(&self) -> usize {
        self.launches.read().await.len()
    }

    async fn next_run(&self) -> MockRun {
        match self.scripted.write().await.pop_front() {
            Some(run) => run,
            None => self.default_run.read().await.clone(),
        }
    }
}

#[async_trait]
impl Engine for MockEngine {
    fn name(&self) -> &str {
        MOCK_ENGINE_NAME
    }

    async fn spawn(&self, args: &ArgumentList) -> Result<Box<dyn EngineProcess>, EngineError> {
        self.launches.write().await.push(args.clone());

        let run = self.next_run().await;
        if run.launch_fails {
            return Err(EngineError::NotFound {
                path: PathBuf::from(MOCK_ENGINE_NAME),
            });
        }

        Ok(Box::new(MockProcess {
            lines: run.lines.into(),
            exit: run.exit,
            output_error: run.output_error,
        }))
    }
}

/// A scripted process handed out by [`MockEngine`].
#[derive(Debug)]
struct MockProcess {
    lines: VecDeque<String>,
    exit: EngineExit,
    output_error: bool,
}

#[async_trait]
impl EngineProcess for MockProcess {
    async fn next_line(&mut self) -> Result<Option<String>, EngineError> {
        if let Some(line) = self.lines.pop_front() {
            return Ok(Some(line));
        }
        if std::mem::take(&mut self.output_error) {
            return Err(EngineError::Io(std::io::Error::other("mock pipe broke")));
        }
        Ok(None)
    }

    async fn wait(&mut self) -> Result<EngineExit, EngineError> {
        Ok(self.exit)
    }
}
