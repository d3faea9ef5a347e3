use std::path::PathBuf;

use clap::Parser;

/// Download a magnet link, torrent URL or torrent file with aria2c.
#[derive(Debug, Parser)]
#[command(name = "ariapilot", version, about)]
pub struct Cli {
    /// Magnet link, http(s) torrent URL, or path to a .torrent file.
    /// Prompted for when omitted.
    pub input: Option<String>,

    /// Configuration file (TOML).
    #[arg(short, long, env = "ARIAPILOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Download destination, overrides pacing.destination.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// aria2c executable, overrides engine.path.
    #[arg(long)]
    pub engine: Option<PathBuf>,

    /// Plain output without a progress bar.
    #[arg(long)]
    pub no_progress: bool,
}
