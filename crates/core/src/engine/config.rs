//! Configuration for the engine module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::EngineError;
use crate::config::home_dir;

/// Where the engine lives and where its own config file goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the aria2c binary, or a bare name looked up on PATH.
    #[serde(default = "default_engine_path")]
    pub path: PathBuf,

    /// Directory holding the generated aria2.conf.
    #[serde(default = "default_conf_dir")]
    pub conf_dir: PathBuf,

    /// Whether to write a default aria2.conf when none exists.
    #[serde(default = "default_write_conf")]
    pub write_conf_file: bool,
}

fn default_engine_path() -> PathBuf {
    PathBuf::from("aria2c")
}

fn default_conf_dir() -> PathBuf {
    home_dir().join(".aria2")
}

fn default_write_conf() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
            conf_dir: default_conf_dir(),
            write_conf_file: default_write_conf(),
        }
    }
}

impl EngineConfig {
    /// Creates a config pointing at a specific binary.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Location of the generated aria2.conf.
    pub fn conf_file(&self) -> PathBuf {
        self.conf_dir.join("aria2.conf")
    }

    /// Resolves the configured binary to a concrete path.
    ///
    /// Anything with a directory component must exist as a file; a bare name
    /// is searched for on PATH.
    pub fn resolve_executable(&self) -> Result<PathBuf, EngineError> {
        let not_found = || EngineError::NotFound {
            path: self.path.clone(),
        };

        if self.path.is_absolute() || self.path.components().count() > 1 {
            return if self.path.is_file() {
                Ok(self.path.clone())
            } else {
                Err(not_found())
            };
        }

        which::which(&self.path).map_err(|_| not_found())
    }
}
