//! Download orchestrator implementation.
//!
//! Runs the engine with the normal profile up to the attempt budget, waiting
//! `n * base` seconds after failed attempt `n`, then makes exactly one more
//! attempt with the fallback profile:
//!
//! ```text
//! Attempting(1) --ok--> Succeeded
//!      | fail
//! Backoff(1) -> Attempting(2) -> ... -> Attempting(N)
//!                                           | fail
//!                                    FallbackAttempt --ok--> Succeeded
//!                                           | fail
//!                                         Failed
//! ```
//!
//! Attempts never overlap: each process is drained and reaped before the
//! next decision is made.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::{Config, PacingConfig};
use crate::engine::{
    build_args, ArgumentList, Engine, EngineError, EngineExit, EngineProcess, Profile,
};
use crate::input::LaunchSpec;
use crate::progress::{NoopSink, ProgressSink, ProgressTracker};

use super::backoff::{Sleeper, TokioSleeper};
use super::config::RetryConfig;
use super::types::{AttemptOutcome, AttemptRecord, DownloadReport, OrchestratorError};

/// Drives one download to completion across retries and the fallback attempt.
pub struct DownloadOrchestrator {
    engine: Arc<dyn Engine>,
    pacing: PacingConfig,
    retry: RetryConfig,
    sink: Arc<dyn ProgressSink>,
    sleeper: Arc<dyn Sleeper>,
}

impl DownloadOrchestrator {
    /// Create a new orchestrator that discards output and sleeps on the tokio timer.
    pub fn new(engine: Arc<dyn Engine>, pacing: PacingConfig, retry: RetryConfig) -> Self {
        Self {
            engine,
            pacing,
            retry,
            sink: Arc::new(NoopSink),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Create an orchestrator from the resolved configuration.
    pub fn from_config(engine: Arc<dyn Engine>, config: &Config) -> Self {
        Self::new(engine, config.pacing.clone(), config.retry.clone())
    }

    /// Send engine output and progress to the given sink.
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the backoff sleeper.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Run the download.
    ///
    /// Launch failures return immediately without consuming the budget. A
    /// failed fallback attempt returns [`OrchestratorError::Exhausted`] carrying
    /// its failure reason and the full attempt log.
    pub async fn run(&self, spec: &LaunchSpec) -> Result<DownloadReport, OrchestratorError> {
        let budget = self.retry.attempts.max(1);
        let mut tracker = ProgressTracker::new(Arc::clone(&self.sink));
        let mut attempts = Vec::new();

        info!("Downloading {}: {}", spec.kind(), spec);
        let normal_args = build_args(spec, &self.pacing, Profile::Normal);

        for number in 1..=budget {
            let label = format!("Attempt {}/{}", number, budget);
            info!("{}", label);

            let outcome = self.run_attempt(&normal_args, &label, &mut tracker).await?;
            attempts.push(record(number, Profile::Normal, &outcome, &tracker));

            let AttemptOutcome::Failed { reason } = outcome else {
                return Ok(report(attempts, &tracker, false));
            };

            warn!("{} failed: {}", label, reason);
            if number < budget {
                let delay = self.retry.delay_after(number);
                info!("Retrying in {} seconds...", delay.as_secs());
                self.sleeper.sleep(delay).await;
            }
        }

        warn!(
            "All {} attempts failed, applying fallback options...",
            budget
        );
        let fallback_args = build_args(spec, &self.pacing, Profile::Fallback);
        let outcome = self
            .run_attempt(&fallback_args, "Fallback attempt", &mut tracker)
            .await?;
        attempts.push(record(budget + 1, Profile::Fallback, &outcome, &tracker));

        match outcome {
            AttemptOutcome::Succeeded => Ok(report(attempts, &tracker, true)),
            AttemptOutcome::Failed { reason } => {
                error!("Fallback attempt failed: {}", reason);
                Err(OrchestratorError::Exhausted { reason, attempts })
            }
        }
    }

    /// Spawns one process, streams its output through the tracker and reaps it.
    async fn run_attempt(
        &self,
        args: &ArgumentList,
        label: &str,
        tracker: &mut ProgressTracker,
    ) -> Result<AttemptOutcome, OrchestratorError> {
        tracker.reset();
        info!("Starting {}: {}", self.engine.name(), args);

        let mut process = self.engine.spawn(args).await?;
        self.sink.attempt_started(label);

        let outcome = match stream(process.as_mut(), tracker).await {
            Ok(exit) if exit.is_success() => {
                info!("Download completed successfully.");
                AttemptOutcome::Succeeded
            }
            Ok(exit) => AttemptOutcome::Failed {
                reason: format!("{} {}", self.engine.name(), exit),
            },
            Err(e) => AttemptOutcome::Failed {
                reason: format!("{} output could not be read: {}", self.engine.name(), e),
            },
        };

        self.sink.attempt_finished(outcome.is_success());
        Ok(outcome)
    }
}

/// Drains the output first, then waits, so a full pipe can never block the exit.
async fn stream(
    process: &mut dyn EngineProcess,
    tracker: &mut ProgressTracker,
) -> Result<EngineExit, EngineError> {
    while let Some(line) = process.next_line().await? {
        debug!("engine: {}", line);
        tracker.observe(&line);
    }
    process.wait().await
}

fn record(
    number: u32,
    profile: Profile,
    outcome: &AttemptOutcome,
    tracker: &ProgressTracker,
) -> AttemptRecord {
    AttemptRecord {
        number,
        profile,
        outcome: outcome.clone(),
        last_progress: tracker.percent(),
        finished_at: Utc::now(),
    }
}

fn report(
    attempts: Vec<AttemptRecord>,
    tracker: &ProgressTracker,
    used_fallback: bool,
) -> DownloadReport {
    DownloadReport {
        attempts,
        final_progress: tracker.percent(),
        used_fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FALLBACK_FLAGS;
    use crate::testing::{MockEngine, MockRun, RecordingSink, RecordingSleeper};
    use std::time::Duration;

    fn magnet() -> LaunchSpec {
        LaunchSpec::Magnet("magnet:?xt=urn:btih:EXAMPLE".to_string())
    }

    fn orchestrator(
        engine: &Arc<MockEngine>,
        sleeper: &Arc<RecordingSleeper>,
    ) -> DownloadOrchestrator {
        DownloadOrchestrator::new(
            engine.clone(),
            PacingConfig::default(),
            RetryConfig::default(),
        )
        .with_sleeper(sleeper.clone())
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let engine = Arc::new(MockEngine::new());
        engine.push_run(MockRun::success(["(40%)", "(100%)"])).await;
        let sleeper = Arc::new(RecordingSleeper::new());

        let report = orchestrator(&engine, &sleeper).run(&magnet()).await.unwrap();

        assert_eq!(report.launches(), 1);
        assert_eq!(report.final_progress, 100);
        assert!(!report.used_fallback);
        assert!(sleeper.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_retry_then_success_backs_off_linearly() {
        let engine = Arc::new(MockEngine::new());
        engine.push_run(MockRun::failure(1, ["(10%)"])).await;
        engine.push_run(MockRun::failure(1, ["(20%)"])).await;
        engine.push_run(MockRun::success(["(100%)"])).await;
        let sleeper = Arc::new(RecordingSleeper::new());

        let report = orchestrator(&engine, &sleeper).run(&magnet()).await.unwrap();

        assert_eq!(report.launches(), 3);
        assert_eq!(
            sleeper.recorded().await,
            vec![Duration::from_secs(5), Duration::from_secs(10)]
        );
        assert!(!report.used_fallback);
        assert_eq!(report.attempts[0].last_progress, 10);
        assert!(report.attempts[2].outcome.is_success());
    }

    #[tokio::test]
    async fn test_fallback_success_after_three_failures() {
        let engine = Arc::new(MockEngine::new());
        for _ in 0..3 {
            engine.push_run(MockRun::failure(7, ["error"])).await;
        }
        engine.push_run(MockRun::success(["(100%)"])).await;
        let sleeper = Arc::new(RecordingSleeper::new());

        let report = orchestrator(&engine, &sleeper).run(&magnet()).await.unwrap();

        assert_eq!(engine.launch_count().await, 4);
        assert_eq!(
            sleeper.recorded().await,
            vec![Duration::from_secs(5), Duration::from_secs(10)]
        );
        assert!(report.used_fallback);
        assert_eq!(report.attempts[3].number, 4);
        assert_eq!(report.attempts[3].profile, Profile::Fallback);

        let launches = engine.launches().await;
        assert_eq!(launches[0], launches[1]);
        assert_eq!(launches[1], launches[2]);
        let normal = launches[0].as_slice();
        let fallback = launches[3].as_slice();
        assert_eq!(&fallback[..normal.len()], normal);
        assert_eq!(&fallback[normal.len()..], FALLBACK_FLAGS);
    }

    #[tokio::test]
    async fn test_everything_fails_is_exhausted_with_last_reason() {
        let engine = Arc::new(MockEngine::new());
        for code in [1, 2, 3, 9] {
            engine.push_run(MockRun::failure(code, Vec::<String>::new())).await;
        }
        let sleeper = Arc::new(RecordingSleeper::new());

        let err = orchestrator(&engine, &sleeper)
            .run(&magnet())
            .await
            .unwrap_err();

        assert_eq!(engine.launch_count().await, 4);
        match err {
            OrchestratorError::Exhausted { reason, attempts } => {
                assert_eq!(reason, "mock-aria2c exited with status 9");
                assert_eq!(attempts.len(), 4);
                assert!(attempts.iter().all(|a| !a.outcome.is_success()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_launch_failure_is_not_retried() {
        let engine = Arc::new(MockEngine::new());
        engine.push_run(MockRun::launch_failure()).await;
        let sleeper = Arc::new(RecordingSleeper::new());

        let err = orchestrator(&engine, &sleeper)
            .run(&magnet())
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestratorError::Launch(_)));
        assert_eq!(engine.launch_count().await, 1);
        assert!(sleeper.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_launch_failure_mid_retry_stops_immediately() {
        let engine = Arc::new(MockEngine::new());
        engine.push_run(MockRun::failure(1, ["boom"])).await;
        engine.push_run(MockRun::launch_failure()).await;
        let sleeper = Arc::new(RecordingSleeper::new());

        let err = orchestrator(&engine, &sleeper)
            .run(&magnet())
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestratorError::Launch(_)));
        assert_eq!(engine.launch_count().await, 2);
        assert_eq!(sleeper.recorded().await, vec![Duration::from_secs(5)]);
    }

    #[tokio::test]
    async fn test_progress_resets_between_attempts_without_clamping() {
        let engine = Arc::new(MockEngine::new());
        engine.push_run(MockRun::failure(1, ["(70%)"])).await;
        engine.push_run(MockRun::success(["no progress here"])).await;
        let sleeper = Arc::new(RecordingSleeper::new());
        let sink = Arc::new(RecordingSink::new());

        let report = orchestrator(&engine, &sleeper)
            .with_sink(sink.clone())
            .run(&magnet())
            .await
            .unwrap();

        // the second attempt never reported a percentage, so it ends at 0
        assert_eq!(report.attempts[0].last_progress, 70);
        assert_eq!(report.final_progress, 0);
        assert_eq!(sink.lines(), vec!["(70%)", "no progress here"]);
        assert_eq!(sink.started(), vec!["Attempt 1/3", "Attempt 2/3"]);
        assert_eq!(sink.finished(), vec![false, true]);
    }

    #[tokio::test]
    async fn test_single_attempt_budget_goes_straight_to_fallback() {
        let engine = Arc::new(MockEngine::new());
        engine.push_run(MockRun::failure(1, ["x"])).await;
        engine.push_run(MockRun::success(["(100%)"])).await;
        let sleeper = Arc::new(RecordingSleeper::new());

        let report = DownloadOrchestrator::new(
            engine.clone(),
            PacingConfig::default(),
            RetryConfig {
                attempts: 1,
                delay_base_secs: 5,
            },
        )
        .with_sleeper(sleeper.clone())
        .run(&magnet())
        .await
        .unwrap();

        assert!(report.used_fallback);
        assert_eq!(report.launches(), 2);
        assert!(sleeper.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_output_error_counts_as_failed_attempt() {
        let engine = Arc::new(MockEngine::new());
        engine.push_run(MockRun::broken_output(["(5%)"])).await;
        engine.push_run(MockRun::success(["(100%)"])).await;
        let sleeper = Arc::new(RecordingSleeper::new());

        let report = orchestrator(&engine, &sleeper).run(&magnet()).await.unwrap();

        assert_eq!(report.launches(), 2);
        match &report.attempts[0].outcome {
            AttemptOutcome::Failed { reason } => {
                assert!(reason.contains("output could not be read"))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
