// src/output.rs
// =============================================================================
// Where report lines go.
//
// The batch coordinator only knows the ReportSink trait. It hands over one
// Report per URL (and at most one proxy failure per batch); the sink decides
// how that looks:
// - ConsoleSink: the report line, green for pass and red for fail
// - JsonSink: one JSON object per line, for scripts
// - CollectingSink: keeps everything in memory
// =============================================================================

use serde::Serialize;
use std::io::IsTerminal;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

use crate::checker::Report;
use crate::error::CheckerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Pass,
    Fail,
}

pub trait ReportSink: Send + Sync {
    /// Called exactly once per URL entry
    fn emit(&self, report: &Report);

    /// Called once when a batch aborts because the proxy could not be set up
    fn proxy_failed(&self, error: &CheckerError);
}

pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
}

/// Wraps `text` in the color for `severity` when `enabled`
pub fn paint(text: &str, severity: Severity, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    let color = match severity {
        Severity::Pass => Colors::GREEN,
        Severity::Fail => Colors::RED,
    };
    format!("{}{}{}", color, text, Colors::RESET)
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    color: bool,
}

impl ConsoleSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colors on unless `--no-color`, NO_COLOR, or stdout is not a terminal
    pub fn detect(no_color: bool) -> Self {
        let color = !no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();
        Self::new(color)
    }
}

impl ReportSink for ConsoleSink {
    fn emit(&self, report: &Report) {
        println!("{}", paint(&report.line(), report.severity(), self.color));
    }

    fn proxy_failed(&self, error: &CheckerError) {
        eprintln!(
            "{}",
            paint(&format!("proxy setup failed: {}", error), Severity::Fail, self.color)
        );
    }
}

// One line of --json output
#[derive(Serialize)]
struct JsonLine<'a> {
    severity: Severity,
    #[serde(flatten)]
    report: &'a Report,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSink;

impl ReportSink for JsonSink {
    fn emit(&self, report: &Report) {
        let line = JsonLine {
            severity: report.severity(),
            report,
        };
        match serde_json::to_string(&line) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!(url = %report.url, error = %e, "could not serialize report"),
        }
    }

    fn proxy_failed(&self, error: &CheckerError) {
        let json = serde_json::json!({
            "severity": Severity::Fail,
            "error": "proxy_setup_failed",
            "message": error.to_string(),
        });
        println!("{}", json);
    }
}

/// Keeps reports in memory, in emission order
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<Report>>,
    failures: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        lock(&self.reports).clone()
    }

    /// Messages of proxy setup failures seen so far
    pub fn failures(&self) -> Vec<String> {
        lock(&self.failures).clone()
    }
}

impl ReportSink for CollectingSink {
    fn emit(&self, report: &Report) {
        lock(&self.reports).push(report.clone());
    }

    fn proxy_failed(&self, error: &CheckerError) {
        lock(&self.failures).push(error.to_string());
    }
}

// A panic while holding the lock leaves the Vec intact, so keep using it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
