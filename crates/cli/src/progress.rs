//! Spinner shown on stderr while a console request is in flight.
//!
//! stdout carries only command results, so table/JSON/CSV output stays
//! pipeable. `--quiet` turns the spinner into a no-op.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

pub(crate) struct Spinner {
    label: String,
    pb: Option<ProgressBar>,
}

impl Spinner {
    pub(crate) fn new(enabled: bool, label: impl Into<String>) -> Self {
        let label = label.into();
        let pb = enabled.then(|| {
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
                .with_style(style)
                .with_message(label.clone());
            pb.enable_steady_tick(TICK);
            pb
        });
        Self { label, pb }
    }

    /// Leave a "<label> done" line on stderr.
    pub(crate) fn finish(&self) {
        if let Some(pb) = &self.pb {
            pb.finish_with_message(format!("{} done", self.label));
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        // An error path never calls finish(); clear the line before the error prints.
        if let Some(pb) = self.pb.as_ref().filter(|pb| !pb.is_finished()) {
            pb.finish_and_clear();
        }
    }
}
