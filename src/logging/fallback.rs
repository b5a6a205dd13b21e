//! Fallback diagnostic channel
//!
//! Used only when the session log itself fails. Reports go to stderr as one line
//! with a `[SessionLog <Kind> ERROR]` prefix. Hosts that want them as `tracing`
//! events implement [`Fallback`] themselves.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::error::LogError;

/// Sink for failures of the logging path itself
pub trait Fallback: Send + Sync {
    fn report(&self, error: &LogError);
}

/// Prefix identifying the reporting component and failure kind
pub fn report_prefix(error: &LogError) -> String {
    format!("[SessionLog {} ERROR]", error.kind())
}

/// Full report line, prefix included
pub(crate) fn report_line(error: &LogError) -> String {
    format!("{} {}", report_prefix(error), error)
}

fn write_report(out: &mut impl Write, error: &LogError) -> std::io::Result<()> {
    writeln!(out, "{}", report_line(error))
}

/// Writes reports to standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrFallback;

impl Fallback for StderrFallback {
    fn report(&self, error: &LogError) {
        let _ = write_report(&mut std::io::stderr().lock(), error);
    }
}

/// Keeps reports in memory; for hosts that surface them in their own UI
#[derive(Debug, Default, Clone)]
pub struct MemoryFallback {
    reports: Arc<Mutex<Vec<String>>>,
}

impl MemoryFallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports so far, prefixed like the stderr channel
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Fallback for MemoryFallback {
    fn report(&self, error: &LogError) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(report_line(error));
        }
    }
}
