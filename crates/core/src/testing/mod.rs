//! Testing utilities and mock implementations.
//!
//! This module provides a scripted engine plus recording sink and sleeper,
//! so the orchestrator can be exercised without aria2 or real waiting.
//!
//! # Example
//!
//! ```rust,ignore
//! use ariapilot_core::testing::{MockEngine, MockRun, RecordingSink, RecordingSleeper};
//!
//! let engine = Arc::new(MockEngine::new());
//! engine.push_run(MockRun::failure(1, ["(30%)"])).await;
//! engine.push_run(MockRun::success(["(100%)"])).await;
//!
//! let sleeper = Arc::new(RecordingSleeper::new());
//! let orchestrator = DownloadOrchestrator::new(engine.clone(), pacing, retry)
//!     .with_sleeper(sleeper.clone());
//! ```

mod mock_engine;
mod recorders;

pub use mock_engine::{MockEngine, MockRun, MOCK_ENGINE_NAME};
pub use recorders::{RecordingSink, RecordingSleeper};
