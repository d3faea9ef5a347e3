pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod progress;
pub mod testing;

pub use config::{
    ensure_engine_conf, load_config, load_config_from_str, prepare_dirs, validate_config, Config,
    ConfigError, PacingConfig,
};
pub use engine::{
    build_args, ArgumentList, Engine, EngineConfig, EngineError, EngineExit, Profile,
    ProcessSupervisor,
};
pub use error::DownloadError;
pub use input::{classify, InputError, LaunchSpec};
pub use orchestrator::{DownloadOrchestrator, DownloadReport, OrchestratorError, RetryConfig};
pub use progress::{extract_percentage, NoopSink, ProgressSink, ProgressTracker};
