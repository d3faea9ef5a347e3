use regex_lite::Regex;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Rate caps use aria2 notation (digits with an optional K/M suffix)
/// - Listen port is not 0
/// - Connections per server is within 1..=16
/// - Summary interval is not 0
/// - Tracker entries are not blank
/// - At least one normal attempt is allowed
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let pacing = &config.pacing;

    let rate = Regex::new(r"^\d+[KkMm]?$")
        .map_err(|e| ConfigError::ValidationError(format!("invalid rate pattern: {}", e)))?;

    for (key, value) in [
        ("pacing.download_limit", &pacing.download_limit),
        ("pacing.upload_limit", &pacing.upload_limit),
    ] {
        if !rate.is_match(value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must look like \"4M\", \"200K\" or \"0\", got {:?}",
                key, value
            )));
        }
    }

    if pacing.listen_port == 0 {
        return Err(ConfigError::ValidationError(
            "pacing.listen_port cannot be 0".to_string(),
        ));
    }

    if !(1..=16).contains(&pacing.max_connections_per_server) {
        return Err(ConfigError::ValidationError(format!(
            "pacing.max_connections_per_server must be between 1 and 16, got {}",
            pacing.max_connections_per_server
        )));
    }

    if pacing.summary_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "pacing.summary_interval_secs cannot be 0".to_string(),
        ));
    }

    if let Some(pos) = pacing.trackers.iter().position(|t| t.trim().is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "pacing.trackers[{}] cannot be empty",
            pos
        )));
    }

    if config.retry.attempts == 0 {
        return Err(ConfigError::ValidationError(
            "retry.attempts must be at least 1".to_string(),
        ));
    }

    if config.engine.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "engine.path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
