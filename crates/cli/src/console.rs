//! Terminal progress sink.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use ariapilot_core::ProgressSink;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Draws one progress bar per attempt and prints engine lines above it.
///
/// Lines are written to `out` whether or not the bar is visible; a bar whose
/// target is not a terminal only stops drawing itself.
pub struct ConsoleSink<W: Write + Send = io::Stdout> {
    bar: Mutex<Option<ProgressBar>>,
    out: Mutex<W>,
    /// `None` disables bars entirely.
    draw_target: Option<fn() -> ProgressDrawTarget>,
}

impl ConsoleSink {
    /// Lines on stdout, bars on stderr when `bars_enabled`.
    pub fn new(bars_enabled: bool) -> Self {
        let draw_target = if bars_enabled {
            Some(ProgressDrawTarget::stderr as fn() -> ProgressDrawTarget)
        } else {
            None
        };
        Self::with_writer(io::stdout(), draw_target)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn with_writer(out: W, draw_target: Option<fn() -> ProgressDrawTarget>) -> Self {
        Self {
            bar: Mutex::new(None),
            out: Mutex::new(out),
            draw_target,
        }
    }

    fn create_bar(label: &str, target: ProgressDrawTarget) -> ProgressBar {
        let pb = ProgressBar::with_draw_target(Some(100), target);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb.set_message(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }

    fn guard(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        lock(&self.bar)
    }

    fn emit(&self, line: &str) {
        let mut out = lock(&self.out);
        // a closed stdout must not abort the download
        let _ = writeln!(out, "{}", line).and_then(|_| out.flush());
    }
}

impl<W: Write + Send> ProgressSink for ConsoleSink<W> {
    fn attempt_started(&self, label: &str) {
        let Some(draw_target) = self.draw_target else {
            self.emit(label);
            return;
        };
        let mut guard = self.guard();
        if let Some(old) = guard.take() {
            old.abandon();
        }
        *guard = Some(Self::create_bar(label, draw_target()));
    }

    fn write_line(&self, line: &str) {
        match &*self.guard() {
            Some(pb) => pb.suspend(|| self.emit(line)),
            None => self.emit(line),
        }
    }

    fn set_progress(&self, percent: u8) {
        if let Some(pb) = &*self.guard() {
            pb.set_position(u64::from(percent));
        }
    }

    fn attempt_finished(&self, success: bool) {
        if let Some(pb) = self.guard().take() {
            if success {
                pb.finish_with_message("done");
            } else {
                pb.abandon_with_message("failed");
            }
        }
    }
}
