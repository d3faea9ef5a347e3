/// Receives engine output and progress updates during a download.
///
/// Implementors can draw progress bars, print to a console, or collect what
/// they receive for later inspection.
pub trait ProgressSink: Send + Sync {
    /// Called before an attempt's process starts producing output.
    fn attempt_started(&self, _label: &str) {}

    /// Called for every raw output line, percentage or not.
    fn write_line(&self, line: &str);

    /// Called with each extracted percentage (0-100).
    fn set_progress(&self, percent: u8);

    /// Called once the attempt's process has exited.
    fn attempt_finished(&self, _success: bool) {}
}

/// A sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn write_line(&self, _line: &str) {}
    fn set_progress(&self, _percent: u8) {}
}
