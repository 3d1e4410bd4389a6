// src/error.rs
// =============================================================================
// Errors that abort a whole batch.
//
// Only proxy setup can fail a batch. Everything that goes wrong with a single
// URL (bad syntax, connection refused, 404, broken markup) is a value carried
// in that URL's report instead, see checker::report.
// =============================================================================

use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
    /// reqwest refused the proxy URL (bad scheme or address)
    #[error("invalid proxy url '{url}': {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Nothing is listening on the proxy endpoint
    #[error("SOCKS5 proxy at {addr} is unreachable: {source}")]
    ProxyUnreachable {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client itself could not be built (TLS backend init, etc.)
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_message_names_the_endpoint() {
        let err = CheckerError::ProxyUnreachable {
            addr: "127.0.0.1:9050".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };
        let message = err.to_string();
        assert!(message.contains("127.0.0.1:9050"));
        assert!(message.contains("refused"));
    }
}
