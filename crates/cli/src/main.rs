mod args;
mod console;
mod prompt;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ariapilot_core::error::EXIT_PRECONDITION;
use ariapilot_core::{
    classify, ensure_engine_conf, load_config, prepare_dirs, validate_config, Config,
    DownloadError, DownloadOrchestrator, DownloadReport, ProcessSupervisor,
};

use args::Cli;
use console::ConsoleSink;

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            exit_code(&e)
        }
    };
    std::process::exit(code);
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let input = prompt::resolve_input(cli.input.clone())?;
    if input.is_empty() {
        return Err(DownloadError::EmptyInput.into());
    }

    // Load configuration
    match &cli.config {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("Using built-in configuration"),
    }
    let mut config = load_config(cli.config.as_deref()).map_err(DownloadError::from)?;
    apply_overrides(&mut config, &cli);
    validate_config(&config).map_err(DownloadError::from)?;

    prepare_dirs(&config).map_err(DownloadError::from)?;
    if config.engine.write_conf_file {
        if let Some(path) = ensure_engine_conf(&config).map_err(DownloadError::from)? {
            info!("Created aria2 config at {:?}", path);
        }
    }

    let supervisor = ProcessSupervisor::new(
        config
            .engine
            .resolve_executable()
            .map_err(DownloadError::from)?,
    );
    info!("Using aria2c at {:?}", supervisor.executable());

    let spec = classify(&input).map_err(DownloadError::from)?;
    info!("Destination: {:?}", config.pacing.destination);

    let orchestrator = DownloadOrchestrator::from_config(Arc::new(supervisor), &config)
        .with_sink(Arc::new(ConsoleSink::new(!cli.no_progress)));

    // Dropping the run future kills the engine through kill_on_drop
    let report = tokio::select! {
        result = orchestrator.run(&spec) => result.map_err(DownloadError::from)?,
        _ = shutdown_signal() => {
            warn!("Interrupted, stopping aria2c");
            return Err(DownloadError::Interrupted.into());
        }
    };

    print_summary(&report, &config);
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(dir) = &cli.dir {
        config.pacing.destination = dir.clone();
    }
    if let Some(engine) = &cli.engine {
        config.engine.path = engine.clone();
    }
}

fn print_summary(report: &DownloadReport, config: &Config) {
    info!(
        "Download complete ({}%) after {} launch(es){}",
        report.final_progress,
        report.launches(),
        if report.used_fallback {
            ", fallback options were needed"
        } else {
            ""
        }
    );
    println!("Saved to {}", config.pacing.destination.display());
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<DownloadError>()
        .map(DownloadError::exit_code)
        .unwrap_or(EXIT_PRECONDITION)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariapilot_core::{EngineError, InputError};
    use std::path::PathBuf;

    #[test]
    fn test_overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "ariapilot",
            "--dir",
            "/srv/torrents",
            "--engine",
            "/usr/local/bin/aria2c",
        ])
        .unwrap();
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.pacing.destination, PathBuf::from("/srv/torrents"));
        assert_eq!(config.engine.path, PathBuf::from("/usr/local/bin/aria2c"));
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let cli = Cli::try_parse_from(["ariapilot"]).unwrap();
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);

        let defaults = Config::default();
        assert_eq!(config.pacing.destination, defaults.pacing.destination);
        assert_eq!(config.engine.path, defaults.engine.path);
    }

    #[test]
    fn test_exit_code_mapping() {
        let empty: anyhow::Error = DownloadError::EmptyInput.into();
        assert_eq!(exit_code(&empty), 1);

        let unrecognized: anyhow::Error = DownloadError::from(InputError::Unrecognized {
            input: "nope".to_string(),
        })
        .into();
        assert_eq!(exit_code(&unrecognized), 1);

        let missing: anyhow::Error = DownloadError::from(EngineError::NotFound {
            path: PathBuf::from("aria2c"),
        })
        .into();
        assert_eq!(exit_code(&missing), 1);

        let exhausted: anyhow::Error = DownloadError::Terminal {
            reason: "aria2c exited with status 7".to_string(),
            attempts: Vec::new(),
        }
        .into();
        assert_eq!(exit_code(&exhausted), 2);

        let interrupted: anyhow::Error = DownloadError::Interrupted.into();
        assert_eq!(exit_code(&interrupted), 130);

        assert_eq!(exit_code(&anyhow::anyhow!("terminal broke")), 1);
    }
}
