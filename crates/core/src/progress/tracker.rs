use std::sync::Arc;

use super::sink::ProgressSink;

/// Best-effort percentage extraction from one line of engine output.
///
/// Takes the text before the first `%`, its last whitespace-separated token,
/// and parses the run of digits that token ends with. `"[#1 2MiB/10MiB(12%)]"`
/// gives 12. Anything that does not fit (no `%`, no trailing digits, a
/// fractional value, more than 100) gives `None`.
pub fn extract_percentage(line: &str) -> Option<u8> {
    let (head, _) = line.split_once('%')?;
    let token = head.split_whitespace().next_back()?;

    let digits_start = token
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;

    if token[..digits_start].ends_with('.') {
        return None;
    }

    token[digits_start..]
        .parse::<u8>()
        .ok()
        .filter(|percent| *percent <= 100)
}

/// Tracks the completion percentage of the current attempt.
///
/// The value follows whatever the engine reports, including going backwards.
pub struct ProgressTracker {
    percent: u8,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressTracker {
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self { percent: 0, sink }
    }

    /// Last extracted percentage, 0 until one is seen.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Starts over for a new attempt.
    pub fn reset(&mut self) {
        self.percent = 0;
    }

    /// Feeds one output line. The line always reaches the sink; a
    /// percentage, if found, is stored and pushed to the sink first.
    pub fn observe(&mut self, line: &str) -> Option<u8> {
        let percent = extract_percentage(line);
        if let Some(percent) = percent {
            self.percent = percent;
            self.sink.set_progress(percent);
        }
        self.sink.write_line(line);
        percent
    }
}
