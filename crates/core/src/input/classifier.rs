use std::path::Path;

use super::types::{InputError, LaunchSpec};

const MAGNET_PREFIX: &str = "magnet:";
const URL_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Classify a raw input string into a launch specification.
///
/// The only side effect is a filesystem check for the local-file rule.
pub fn classify(raw: &str) -> Result<LaunchSpec, InputError> {
    if raw.starts_with(MAGNET_PREFIX) {
        return Ok(LaunchSpec::Magnet(raw.to_string()));
    }

    if URL_PREFIXES.iter().any(|prefix| raw.starts_with(prefix)) {
        return Ok(LaunchSpec::DirectUrl(raw.to_string()));
    }

    let path = Path::new(raw);
    if !raw.is_empty() && path.is_file() {
        return Ok(LaunchSpec::LocalDescriptor(path.to_path_buf()));
    }

    Err(InputError::Unrecognized {
        input: raw.to_string(),
    })
}
