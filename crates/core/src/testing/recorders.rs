//! Recording sink and sleeper for test assertions.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::orchestrator::Sleeper;
use crate::progress::ProgressSink;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
    progress: Mutex<Vec<u8>>,
    started: Mutex<Vec<String>>,
    finished: Mutex<Vec<bool>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line written, across all attempts.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    /// Every percentage pushed, in order.
    pub fn progress_updates(&self) -> Vec<u8> {
        lock(&self.progress).clone()
    }

    /// Last percentage pushed, if any.
    pub fn last_progress(&self) -> Option<u8> {
        lock(&self.progress).last().copied()
    }

    /// Labels of started attempts.
    pub fn started(&self) -> Vec<String> {
        lock(&self.started).clone()
    }

    /// Success flags of finished attempts.
    pub fn finished(&self) -> Vec<bool> {
        lock(&self.finished).clone()
    }
}

impl ProgressSink for RecordingSink {
    fn attempt_started(&self, label: &str) {
        lock(&self.started).push(label.to_string());
    }

    fn write_line(&self, line: &str) {
        lock(&self.lines).push(line.to_string());
    }

    fn set_progress(&self, percent: u8) {
        lock(&self.progress).push(percent);
    }

    fn attempt_finished(&self, success: bool) {
        lock(&self.finished).push(success);
    }
}

/// Sleeper that records requested durations and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<RwLock<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far.
    pub async fn recorded(&self) -> Vec<Duration> {
        self.slept.read().await.clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.write().await.push(duration);
    }
}
