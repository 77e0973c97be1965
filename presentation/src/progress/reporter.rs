//! Progress reporting for synergy runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tandem_application::ports::progress::ProgressSink;

/// Reports synergy progress with a live spinner
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressReporter {
    fn on_step(&self, note: &str) {
        self.spinner.set_message(note.to_string());
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressSink for SimpleProgress {
    fn on_step(&self, note: &str) {
        println!("{} {}", "->".cyan(), note.dimmed());
    }
}
