use std::path::Path;

use anyhow::{Context, Result};
use ariapilot_core::DownloadError;
use inquire::{InquireError, Text};

/// Resolve the input from the argument, prompting when it is missing.
///
/// The result is trimmed and a leading `~/` is expanded to the home
/// directory; an empty string means the user gave nothing. Escape at the
/// prompt counts as empty input, Ctrl+C as an interruption.
pub fn resolve_input(arg: Option<String>) -> Result<String> {
    let raw = match arg {
        Some(raw) => raw,
        None => match Text::new("Magnet link, torrent URL, or torrent file path:")
            .with_help_message("e.g. magnet:?xt=urn:btih:... or ~/Downloads/file.torrent")
            .prompt()
        {
            Ok(raw) => raw,
            Err(InquireError::OperationCanceled) => String::new(),
            Err(InquireError::OperationInterrupted) => {
                return Err(DownloadError::Interrupted.into())
            }
            Err(e) => return Err(e).context("Failed to read input"),
        },
    };

    Ok(expand_home(raw.trim(), dirs::home_dir().as_deref()))
}

fn expand_home(input: &str, home: Option<&Path>) -> String {
    let rest = match input.strip_prefix("~/") {
        Some(rest) => rest,
        None if input == "~" => "",
        None => return input.to_string(),
    };
    match home {
        Some(home) => home.join(rest).to_string_lossy().into_owned(),
        None => input.to_string(),
    }
}
