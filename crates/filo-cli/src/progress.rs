//! Progress reporting for LLM batches

use std::io::{self, Write};

/// Simple carriage-return progress reporter on stderr
pub struct ProgressReporter {
    total: usize,
    label: String,
}

impl ProgressReporter {
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        Self {
            total,
            label: label.into(),
        }
    }

    pub fn update(&self, processed: usize) {
        if self.total == 0 {
            return;
        }
        let percentage = (processed as f64 / self.total as f64 * 100.0) as u32;
        eprint!(
            "\r  {} [{}%] ({}/{})    ",
            self.label, percentage, processed, self.total
        );
        io::stderr().flush().ok();
    }

    pub fn finish(&self) {
        eprintln!();
    }
}
