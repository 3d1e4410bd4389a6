// src/lib.rs
// =============================================================================
// link-warden checks a list of URLs through a local SOCKS5 proxy and prints
// one colored line per URL: the status code and page title when the URL is
// reachable, the status code and URL when it is not.
//
// Host programs drive it through `LinkChecker`:
//
//     let sink = Arc::new(ConsoleSink::detect(false));
//     let checker = LinkChecker::with_proxy(ProxyConfig::default(), sink);
//     let code = checker.run(&["https://example.com"]).await; // 0 or 1
//
// The title scanner is single-threaded, so the run future is not Send: await
// it from the task that owns the runtime rather than tokio::spawn.
//
// Modules:
// - checker: validation, proxied fetch, title extraction, report lines
// - batch: runs one list of URLs, one batch at a time
// - output: where report lines are written
// =============================================================================

pub mod batch;
pub mod checker;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;

pub use batch::{BatchSummary, LinkChecker, EXIT_COMPLETED, EXIT_PROXY_FAILED};
pub use config::ProxyConfig;
pub use error::CheckerError;
