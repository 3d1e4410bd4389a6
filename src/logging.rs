// src/logging.rs
// =============================================================================
// tracing setup for the binary.
//
// Logs go to stderr so stdout only carries report lines. RUST_LOG wins when
// set; otherwise only warnings are shown, or debug output for this crate
// with --verbose.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,link_warden=debug"
    } else {
        "warn"
    }
}

pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!("logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_parse() {
        for verbose in [false, true] {
            assert!(default_filter(verbose).parse::<EnvFilter>().is_ok());
        }
        assert!(default_filter(true).contains("link_warden=debug"));
    }
}
