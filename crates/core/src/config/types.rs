use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::engine::EngineConfig;
use crate::orchestrator::RetryConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Rate, connection and peer-discovery settings handed to the engine on every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Overall download cap in aria2 notation (e.g. "4M", "512K", "0" for unlimited)
    #[serde(default = "default_download_limit")]
    pub download_limit: String,
    /// Overall upload cap in aria2 notation
    #[serde(default = "default_upload_limit")]
    pub upload_limit: String,
    #[serde(default = "default_max_connections")]
    pub max_connections_per_server: u32,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default = "default_true")]
    pub enable_dht: bool,
    #[serde(default = "default_true")]
    pub enable_pex: bool,
    /// How often the engine prints its progress summary, in seconds
    #[serde(default = "default_summary_interval")]
    pub summary_interval_secs: u32,
    /// Destination directory for downloaded content
    #[serde(default = "default_destination")]
    pub destination: PathBuf,
    /// Extra announce endpoints appended to whatever the torrent carries
    #[serde(default = "default_trackers")]
    pub trackers: Vec<String>,
}

impl PacingConfig {
    /// Announce endpoints with duplicates removed, first occurrence wins.
    pub fn announce_list(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.trackers
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty() && seen.insert(*t))
            .collect()
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            download_limit: default_download_limit(),
            upload_limit: default_upload_limit(),
            max_connections_per_server: default_max_connections(),
            listen_port: default_listen_port(),
            enable_dht: true,
            enable_pex: true,
            summary_interval_secs: default_summary_interval(),
            destination: default_destination(),
            trackers: default_trackers(),
        }
    }
}

fn default_download_limit() -> String {
    "4M".to_string()
}

fn default_upload_limit() -> String {
    "200K".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_listen_port() -> u16 {
    6881
}

fn default_true() -> bool {
    true
}

fn default_summary_interval() -> u32 {
    1
}

pub(crate) fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_destination() -> PathBuf {
    home_dir().join("Downloads")
}

fn default_trackers() -> Vec<String> {
    [
        "udp://tracker.opentrackr.org:1337/announce",
        "udp://open.stealth.si:80/announce",
        "udp://tracker.torrent.eu.org:451/announce",
        "udp://opentracker.i2p.rocks:6969/announce",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}
