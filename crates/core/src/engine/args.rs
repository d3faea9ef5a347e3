//! Engine argument construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PacingConfig;
use crate::input::LaunchSpec;

/// Flags appended for the single fallback attempt. They loosen timing
/// assumptions so a degraded network still has a chance to finish.
pub const FALLBACK_FLAGS: [&str; 5] = [
    "--bt-enable-lpd=true",
    "--bt-detach-seed-only=true",
    "--timeout=30",
    "--connect-timeout=20",
    "--retry-wait=10",
];

/// Which set of flags to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Normal,
    Fallback,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Normal => "normal",
            Profile::Fallback => "fallback",
        }
    }
}

/// The literal arguments for one engine invocation, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentList(Vec<String>);

impl ArgumentList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for ArgumentList {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Builds the engine arguments for a launch spec.
///
/// Pure and deterministic: the same inputs always give the same list. The
/// fallback list is the normal list followed by [`FALLBACK_FLAGS`].
pub fn build_args(spec: &LaunchSpec, pacing: &PacingConfig, profile: Profile) -> ArgumentList {
    let mut args = vec![
        format!("--enable-dht={}", pacing.enable_dht),
        format!("--enable-peer-exchange={}", pacing.enable_pex),
        format!("--max-overall-download-limit={}", pacing.download_limit),
        format!("--max-overall-upload-limit={}", pacing.upload_limit),
        format!(
            "--max-connection-per-server={}",
            pacing.max_connections_per_server
        ),
        "--continue=true".to_string(),
        "--auto-file-renaming=true".to_string(),
        format!("--summary-interval={}", pacing.summary_interval_secs),
        format!("--dir={}", pacing.destination.display()),
        format!("--listen-port={}", pacing.listen_port),
    ];

    let trackers = pacing.announce_list();
    if !trackers.is_empty() {
        args.push(format!("--bt-tracker={}", trackers.join(",")));
    }

    match spec {
        LaunchSpec::Magnet(uri) | LaunchSpec::DirectUrl(uri) => args.push(uri.clone()),
        LaunchSpec::LocalDescriptor(path) => {
            args.push("-T".to_string());
            args.push(path.to_string_lossy().into_owned());
        }
    }

    if profile == Profile::Fallback {
        args.extend(FALLBACK_FLAGS.iter().map(|flag| flag.to_string()));
    }

    ArgumentList(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn pacing() -> PacingConfig {
        PacingConfig {
            destination: PathBuf::from("/data/downloads"),
            trackers: vec![
                "udp://t1:1337/announce".to_string(),
                "udp://t2:80/announce".to_string(),
                "udp://t1:1337/announce".to_string(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_magnet_normal_args() {
        let spec = LaunchSpec::Magnet("magnet:?xt=urn:btih:abc".to_string());
        let args = build_args(&spec, &pacing(), Profile::Normal);

        assert_eq!(
            args.as_slice(),
            [
                "--enable-dht=true",
                "--enable-peer-exchange=true",
                "--max-overall-download-limit=4M",
                "--max-overall-upload-limit=200K",
                "--max-connection-per-server=4",
                "--continue=true",
                "--auto-file-renaming=true",
                "--summary-interval=1",
                "--dir=/data/downloads",
                "--listen-port=6881",
                "--bt-tracker=udp://t1:1337/announce,udp://t2:80/announce",
                "magnet:?xt=urn:btih:abc",
            ]
        );
    }

    #[test]
    fn test_url_is_positional_tail() {
        let spec = LaunchSpec::DirectUrl("https://example.com/a.torrent".to_string());
        let args = build_args(&spec, &pacing(), Profile::Normal);
        assert_eq!(
            args.as_slice().last().map(String::as_str),
            Some("https://example.com/a.torrent")
        );
    }

    #[test]
    fn test_local_descriptor_uses_torrent_file_flag() {
        let spec = LaunchSpec::LocalDescriptor(PathBuf::from("/tmp/ubuntu.torrent"));
        let args = build_args(&spec, &pacing(), Profile::Normal).into_vec();
        let n = args.len();
        assert_eq!(args[n - 2], "-T");
        assert_eq!(args[n - 1], "/tmp/ubuntu.torrent");
    }

    #[test]
    fn test_disabled_discovery_and_no_trackers() {
        let pacing = PacingConfig {
            enable_dht: false,
            enable_pex: false,
            trackers: Vec::new(),
            ..pacing()
        };
        let spec = LaunchSpec::Magnet("magnet:?xt=urn:btih:abc".to_string());
        let args = build_args(&spec, &pacing, Profile::Normal);

        assert_eq!(args.as_slice()[0], "--enable-dht=false");
        assert_eq!(args.as_slice()[1], "--enable-peer-exchange=false");
        assert!(!args.iter().any(|a| a.starts_with("--bt-tracker=")));
        assert_eq!(args.len(), 11);
    }

    #[test]
    fn test_build_is_deterministic() {
        let spec = LaunchSpec::Magnet("magnet:?xt=urn:btih:abc".to_string());
        for profile in [Profile::Normal, Profile::Fallback] {
            assert_eq!(
                build_args(&spec, &pacing(), profile),
                build_args(&spec, &pacing(), profile)
            );
        }
    }

    #[test]
    fn test_fallback_extends_normal() {
        let specs = [
            LaunchSpec::Magnet("magnet:?xt=urn:btih:abc".to_string()),
            LaunchSpec::DirectUrl("http://example.com/x.torrent".to_string()),
            LaunchSpec::LocalDescriptor(PathBuf::from("/tmp/x.torrent")),
        ];

        for spec in &specs {
            let normal = build_args(spec, &pacing(), Profile::Normal);
            let fallback = build_args(spec, &pacing(), Profile::Fallback);

            assert_eq!(fallback.len(), normal.len() + FALLBACK_FLAGS.len());
            assert_eq!(&fallback.as_slice()[..normal.len()], normal.as_slice());
            assert_eq!(&fallback.as_slice()[normal.len()..], FALLBACK_FLAGS);
        }
    }

    #[test]
    fn test_display_joins_with_spaces() {
        let args = ArgumentList::from(vec!["--a=1".to_string(), "uri".to_string()]);
        assert_eq!(args.to_string(), "--a=1 uri");
    }
}
