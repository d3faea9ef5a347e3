//! One-time aria2 configuration file and directory preparation.

use std::path::PathBuf;
use tracing::{debug, info};

use super::{types::Config, ConfigError};

/// Create the destination and engine configuration directories if missing.
pub fn prepare_dirs(config: &Config) -> Result<(), ConfigError> {
    for dir in [&config.pacing.destination, &config.engine.conf_dir] {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
        debug!("Ensured directory {}", dir.display());
    }
    Ok(())
}

/// Render the persistent aria2 configuration for the given settings.
pub fn render_engine_conf(config: &Config) -> String {
    let pacing = &config.pacing;

    let mut lines = vec![
        format!("dir={}", pacing.destination.display()),
        "continue=true".to_string(),
        "check-integrity=true".to_string(),
        format!("max-overall-download-limit={}", pacing.download_limit),
        format!("max-overall-upload-limit={}", pacing.upload_limit),
        format!(
            "max-connection-per-server={}",
            pacing.max_connections_per_server
        ),
        "min-split-size=10M".to_string(),
        "split=8".to_string(),
        "enable-rpc=false".to_string(),
        format!("summary-interval={}", pacing.summary_interval_secs),
        "console-log-level=notice".to_string(),
        "file-allocation=prealloc".to_string(),
        format!("listen-port={}", pacing.listen_port),
        format!("enable-dht={}", pacing.enable_dht),
        format!("enable-peer-exchange={}", pacing.enable_pex),
        "bt-enable-lpd=true".to_string(),
        "bt-tracker-connect-timeout=10".to_string(),
        "bt-tracker-timeout=15".to_string(),
        "bt-timeout=60".to_string(),
        "bt-request-peer-speed-limit=512K".to_string(),
        "bt-max-peers=55".to_string(),
    ];

    let trackers = pacing.announce_list();
    if !trackers.is_empty() {
        lines.push(format!("bt-tracker={}", trackers.join(",")));
    }

    lines.join("\n")
}

/// Write the engine configuration file unless one already exists.
///
/// Returns the path only when a new file was written.
pub fn ensure_engine_conf(config: &Config) -> Result<Option<PathBuf>, ConfigError> {
    let path = config.engine.conf_file();
    if path.exists() {
        debug!("Engine config already present at {}", path.display());
        return Ok(None);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }

    std::fs::write(&path, render_engine_conf(config)).map_err(|e| ConfigError::io(&path, e))?;
    info!("Created default engine config at {}", path.display());

    Ok(Some(path))
}
