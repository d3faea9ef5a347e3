use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment prefix for overrides, e.g. `ARIAPILOT_PACING__LISTEN_PORT=6999`
pub const ENV_PREFIX: &str = "ARIAPILOT_";

/// Load configuration from built-in defaults, an optional TOML file and
/// environment variable overrides, in that order of precedence.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[engine]
path = "/opt/aria2/aria2c"

[retry]
attempts = 5
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.engine.path, PathBuf::from("/opt/aria2/aria2c"));
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.delay_base_secs, 5);
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[pacing]
listen_port = "not-a-port"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Some(Path::new("/nonexistent/ariapilot.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_without_file_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.pacing.max_connections_per_server, 4);
        assert_eq!(config.retry.attempts, 3);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[pacing]
listen_port = 6999
destination = "/srv/downloads"
"#
        )
        .unwrap();

        let config = load_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.pacing.listen_port, 6999);
        assert_eq!(config.pacing.destination, PathBuf::from("/srv/downloads"));
        // untouched keys keep their defaults
        assert_eq!(config.pacing.download_limit, "4M");
    }
}
