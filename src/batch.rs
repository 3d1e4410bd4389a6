// src/batch.rs
// =============================================================================
// The batch coordinator: runs one ordered list of URLs from start to end.
//
// Phases:
//   Init -> ProxySetup -> Iterating -> Done
//                     \-> Failed   (proxy could not be set up, nothing reported)
//
// For every URL, in input order and one at a time:
//   validate -> GET through the proxy -> read the title -> report
//
// A failing URL is reported and the batch moves on. Only proxy setup can
// stop a batch.
//
// One LinkChecker runs one batch at a time. The batch lock is taken before
// proxy setup and released when run_batch returns (on every path, since it
// is a guard), so a second caller waits until the first batch has printed
// its last line.
// =============================================================================

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::checker::{
    extract_title, passes, validate_url, Connector, Fetcher, Report, SocksConnector,
};
use crate::config::ProxyConfig;
use crate::error::CheckerError;
use crate::output::{ReportSink, Severity};

/// Every URL was processed (individual failures were reported)
pub const EXIT_COMPLETED: i32 = 0;
/// The proxy could not be set up; no URL was processed
pub const EXIT_PROXY_FAILED: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    ProxySetup,
    Iterating,
    Done,
    Failed,
}

fn enter(phase: Phase) {
    debug!(?phase, "batch phase");
}

/// Counts for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, severity: Severity) {
        self.total += 1;
        match severity {
            Severity::Pass => self.passed += 1,
            Severity::Fail => self.failed += 1,
        }
    }
}

pub struct LinkChecker {
    connector: Box<dyn Connector>,
    sink: Arc<dyn ReportSink>,
    batch_lock: Mutex<()>,
}

impl LinkChecker {
    pub fn new(connector: impl Connector + 'static, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            connector: Box::new(connector),
            sink,
            batch_lock: Mutex::new(()),
        }
    }

    /// A checker that goes through the SOCKS5 proxy in `config`
    pub fn with_proxy(config: ProxyConfig, sink: Arc<dyn ReportSink>) -> Self {
        Self::new(SocksConnector::new(config), sink)
    }

    /// Runs a batch and returns its exit code:
    /// EXIT_COMPLETED (0) or EXIT_PROXY_FAILED (1)
    pub async fn run<S>(&self, urls: &[S]) -> i32
    where
        S: AsRef<str> + Sync,
    {
        match self.run_batch(urls).await {
            Ok(_) => EXIT_COMPLETED,
            Err(_) => EXIT_PROXY_FAILED,
        }
    }

    /// Runs a batch, emitting exactly one report per URL
    ///
    /// Returns Err only when the proxy could not be set up; in that case no
    /// report was emitted and the sink got a single proxy_failed call.
    pub async fn run_batch<S>(&self, urls: &[S]) -> Result<BatchSummary, CheckerError>
    where
        S: AsRef<str> + Sync,
    {
        let _batch = self.batch_lock.lock().await;

        enter(Phase::Init);
        debug!(urls = urls.len(), "batch started");

        enter(Phase::ProxySetup);
        let fetcher = match self.connector.connect().await {
            Ok(fetcher) => fetcher,
            Err(err) => {
                enter(Phase::Failed);
                error!(error = %err, "proxy setup failed, batch aborted");
                self.sink.proxy_failed(&err);
                return Err(err);
            }
        };

        enter(Phase::Iterating);
        let mut summary = BatchSummary::default();
        for url in urls {
            let report = check_url(fetcher.as_ref(), url.as_ref()).await;
            summary.record(report.severity());
            self.sink.emit(&report);
        }

        enter(Phase::Done);
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "batch complete"
        );
        Ok(summary)
    }
}

// Processes one URL entry into its report
//
// The fetched page (and with it the response body) is dropped when this
// function returns, which closes the connection whatever path was taken.
async fn check_url(fetcher: &dyn Fetcher, url: &str) -> Report {
    let parsed = match validate_url(url) {
        Ok(parsed) => parsed,
        Err(reason) => {
            debug!(url, %reason, "rejected before fetching");
            return Report::invalid(url, &reason);
        }
    };

    let mut page = match fetcher.get(&parsed).await {
        Ok(page) => page,
        Err(err) => {
            debug!(url, error = %err, "request failed");
            return Report::transport_error(url, &err);
        }
    };

    if !passes(page.status) {
        return Report::failed(url, page.status);
    }

    let title = extract_title(page.body.as_mut()).await;
    Report::passed(url, page.status, title)
}
