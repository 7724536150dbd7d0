//! Observation sink: line-oriented output of what the agent saw and did.
//!
//! Separate from `log`: the console lines are the agent's visible behavior, logging is diagnostics.

use std::io::Write;
use std::sync::Mutex;

pub trait ObservationSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes each line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ObservationSink for ConsoleSink {
    fn emit(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", line) {
            log::debug!("console sink write failed: {}", e);
        }
    }
}

/// Keeps lines in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|g| g.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ObservationSink for MemorySink {
    fn emit(&self, line: &str) {
        let mut g = self
            .lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        g.push(line.to_string());
    }
}
