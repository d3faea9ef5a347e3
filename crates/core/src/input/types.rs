use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What the engine should download.
///
/// Only built by [`classify`](super::classify), so a value always reflects a
/// string that passed one of the classification rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchSpec {
    /// A `magnet:` URI, kept verbatim.
    Magnet(String),
    /// An `http(s)://` URL pointing at a torrent file or plain download.
    DirectUrl(String),
    /// A torrent file on local disk.
    LocalDescriptor(PathBuf),
}

impl LaunchSpec {
    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            LaunchSpec::Magnet(_) => "magnet",
            LaunchSpec::DirectUrl(_) => "url",
            LaunchSpec::LocalDescriptor(_) => "torrent file",
        }
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchSpec::Magnet(uri) | LaunchSpec::DirectUrl(uri) => f.write_str(uri),
            LaunchSpec::LocalDescriptor(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Errors raised while classifying input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("not a magnet link, URL, or existing file path: {input}")]
    Unrecognized { input: String },
}
