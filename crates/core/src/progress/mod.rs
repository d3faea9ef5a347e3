//! Progress extraction from engine output.
//!
//! Every engine line goes to a [`ProgressSink`] for display. Lines that carry
//! a completion percentage also update the tracked value and the sink's bar.

mod sink;
mod tracker;

pub use sink::{NoopSink, ProgressSink};
pub use tracker::{extract_percentage, ProgressTracker};
