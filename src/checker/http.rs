// src/checker/http.rs
// =============================================================================
// This module fetches URLs through the local SOCKS5 proxy.
//
// Key functionality:
// - Builds one reqwest client per batch with the proxy attached
// - Connects to the proxy endpoint once so a missing proxy fails the batch up front
// - Makes one plain GET per URL: no timeout, default redirects, no retries
// - Hands back the status code plus the still-open body for title scanning
//
// The network side sits behind three small traits (Connector, Fetcher, Body)
// so the batch coordinator can be driven by an in-memory fetcher in tests.
//
// Rust concepts:
// - Trait objects (Box<dyn Fetcher>): pick the implementation at runtime
// - async-trait: lets trait methods be async and still be object safe
// - From<reqwest::Error>: the ? operator converts errors for us
// =============================================================================

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Proxy};
use serde::Serialize;
use std::error::Error as _;
use thiserror::Error;
use tokio::net::TcpStream;
use tracing::debug;
use url::Url;

use crate::config::ProxyConfig;
use crate::error::CheckerError;

// Why a request failed before any response arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Request timed out
    Timeout,
    /// Too many redirects (redirect loop)
    TooManyRedirects,
    /// The proxy or the target refused / dropped the connection
    Connect,
    /// SSL/TLS handshake or certificate problem
    Tls,
    /// The connection broke while the body was being read
    ///
    /// Only produced by Body::next_chunk. Title extraction logs it at debug
    /// level and carries on with an empty title, so it never shows up in a
    /// report.
    Body,
    /// Other error
    Other,
}

impl FetchErrorKind {
    /// Short label used in report lines
    pub fn describe(&self) -> &'static str {
        match self {
            FetchErrorKind::Timeout => "request timed out",
            FetchErrorKind::TooManyRedirects => "too many redirects",
            FetchErrorKind::Connect => "connection failed",
            FetchErrorKind::Tls => "TLS error",
            FetchErrorKind::Body => "body read failed",
            FetchErrorKind::Other => "request failed",
        }
    }
}

#[derive(Debug, Error)]
#[error("{}: {}", .kind.describe(), .message)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    /// The full error chain, for logs and --json output
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        let message = error_chain(&error);
        Self {
            kind: categorize_error(&error.without_url()),
            message,
        }
    }
}

// Categorizes different error types from reqwest
//
// Only the error itself is inspected. When send() fails there is no
// response at all, so nothing here may assume one exists. The URL must be
// stripped first: a host like ssl.example.com is not a TLS failure.
fn categorize_error(error: &reqwest::Error) -> FetchErrorKind {
    let lowered = error_chain(error).to_lowercase();

    if error.is_timeout() {
        FetchErrorKind::Timeout
    } else if error.is_redirect() {
        FetchErrorKind::TooManyRedirects
    } else if error.is_body() || error.is_decode() {
        FetchErrorKind::Body
    } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl") {
        // TLS failures surface as connect errors too, so check them first
        FetchErrorKind::Tls
    } else if error.is_connect() {
        FetchErrorKind::Connect
    } else {
        FetchErrorKind::Other
    }
}

// "error sending request: ... : connection refused"
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// A response body that is read chunk by chunk
///
/// Dropping a body closes it and releases the connection.
#[async_trait]
pub trait Body: Send {
    /// Next chunk of bytes, or None at the end of the body
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, FetchError>;
}

/// A completed GET: status line received, body not read yet
pub struct FetchedPage {
    pub status: u16,
    pub body: Box<dyn Body>,
}

/// Performs GET requests over an established transport
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Sets up the transport once per batch
///
/// An error here is fatal for the batch.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Fetcher>, CheckerError>;
}

/// Connects through a SOCKS5 proxy described by a ProxyConfig
#[derive(Debug, Clone, Default)]
pub struct SocksConnector {
    config: ProxyConfig,
}

impl SocksConnector {
    pub fn new(config: ProxyConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for SocksConnector {
    async fn connect(&self) -> Result<Box<dyn Fetcher>, CheckerError> {
        let fetcher = ProxiedFetcher::connect(&self.config).await?;
        Ok(Box::new(fetcher))
    }
}

/// reqwest client with every request routed through the proxy
///
/// The client keeps its own connection pool, so one instance serves every
/// GET of a batch.
#[derive(Debug)]
pub struct ProxiedFetcher {
    client: Client,
}

impl ProxiedFetcher {
    pub async fn connect(config: &ProxyConfig) -> Result<Self, CheckerError> {
        let url = config.proxy_url();
        let proxy = Proxy::all(&url).map_err(|source| CheckerError::InvalidProxy {
            url: url.clone(),
            source,
        })?;

        if config.check_proxy {
            // reqwest only dials the proxy on the first request, so check
            // that something is listening before the batch starts
            TcpStream::connect(config.addr)
                .await
                .map_err(|source| CheckerError::ProxyUnreachable {
                    addr: config.addr,
                    source,
                })?;
            debug!(proxy = %url, "proxy endpoint is accepting connections");
        }

        // No .timeout() and no .redirect(): requests may take as long as the
        // server needs and redirects follow reqwest's default policy
        let client = Client::builder()
            .proxy(proxy)
            .build()
            .map_err(CheckerError::ClientBuild)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for ProxiedFetcher {
    async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        debug!(%url, status, "response received");

        Ok(FetchedPage {
            status,
            body: Box::new(ResponseBody(response)),
        })
    }
}

struct ResponseBody(reqwest::Response);

#[async_trait]
impl Body for ResponseBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, FetchError> {
        Ok(self.0.chunk().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::title::extract_title;
    use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Minimal no-auth SOCKS5 CONNECT relay (RFC 1928), enough for reqwest
    async fn spawn_socks_relay() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut inbound, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let _ = relay(&mut inbound).await;
                });
            }
        });
        addr
    }

    async fn relay(inbound: &mut TcpStream) -> std::io::Result<()> {
        let mut greeting = [0u8; 2];
        inbound.read_exact(&mut greeting).await?;
        let mut methods = vec![0u8; greeting[1] as usize];
        inbound.read_exact(&mut methods).await?;
        inbound.write_all(&[5, 0]).await?;

        let mut request = [0u8; 4];
        inbound.read_exact(&mut request).await?;
        let host = match request[3] {
            1 => {
                let mut ip = [0u8; 4];
                inbound.read_exact(&mut ip).await?;
                Ipv4Addr::from(ip).to_string()
            }
            3 => {
                let mut len = [0u8; 1];
                inbound.read_exact(&mut len).await?;
                let mut name = vec![0u8; len[0] as usize];
                inbound.read_exact(&mut name).await?;
                String::from_utf8_lossy(&name).into_owned()
            }
            4 => {
                let mut ip = [0u8; 16];
                inbound.read_exact(&mut ip).await?;
                Ipv6Addr::from(ip).to_string()
            }
            other => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("address type {}", other),
                ))
            }
        };
        let mut port = [0u8; 2];
        inbound.read_exact(&mut port).await?;
        let port = u16::from_be_bytes(port);

        let mut outbound = TcpStream::connect((host.as_str(), port)).await?;
        inbound.write_all(&[5, 0, 0, 1, 0, 0, 0, 0, 0, 0]).await?;
        tokio::io::copy_bidirectional(inbound, &mut outbound).await?;
        Ok(())
    }

    fn closed_port() -> SocketAddr {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(FetchErrorKind::Connect.describe(), "connection failed");
        let err = FetchError::new(FetchErrorKind::Timeout, "deadline");
        assert_eq!(err.to_string(), "request timed out: deadline");
    }

    #[tokio::test]
    async fn test_unreachable_proxy_fails_setup() {
        let config = ProxyConfig::with_addr(closed_port());
        let err = ProxiedFetcher::connect(&config).await.unwrap_err();
        assert!(matches!(err, CheckerError::ProxyUnreachable { .. }));
    }

    #[tokio::test]
    async fn test_setup_without_proxy_check_does_not_dial() {
        let config = ProxyConfig {
            check_proxy: false,
            ..ProxyConfig::with_addr(closed_port())
        };
        assert!(ProxiedFetcher::connect(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_through_socks_relay() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><head><title>Example</title></head><body>hi</body></html>")
            .create_async()
            .await;

        let relay = spawn_socks_relay().await;
        let fetcher = ProxiedFetcher::connect(&ProxyConfig::with_addr(relay))
            .await
            .unwrap();

        let url = Url::parse(&format!("{}/page", server.url())).unwrap();
        let mut page = fetcher.get(&url).await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(extract_title(page.body.as_mut()).await, "Example");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_status_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let relay = spawn_socks_relay().await;
        let fetcher = ProxiedFetcher::connect(&ProxyConfig::with_addr(relay))
            .await
            .unwrap();

        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let page = fetcher.get(&url).await.unwrap();
        assert_eq!(page.status, 404);
    }

    #[tokio::test]
    async fn test_url_text_does_not_decide_the_error_kind() {
        // Nothing listens on the proxy port, so the request cannot connect
        let config = ProxyConfig {
            check_proxy: false,
            ..ProxyConfig::with_addr(closed_port())
        };
        let fetcher = ProxiedFetcher::connect(&config).await.unwrap();

        let url = Url::parse("http://127.0.0.1:9/ssl/tls-certificate").unwrap();
        let err = match fetcher.get(&url).await {
            Ok(_) => panic!("request through a dead proxy succeeded"),
            Err(err) => err,
        };
        assert_eq!(err.kind, FetchErrorKind::Connect);
        assert!(err.message.contains("ssl/tls-certificate"));
    }

    #[tokio::test]
    async fn test_dead_target_is_a_fetch_error() {
        let relay = spawn_socks_relay().await;
        let fetcher = ProxiedFetcher::connect(&ProxyConfig::with_addr(relay))
            .await
            .unwrap();

        let url = Url::parse(&format!("http://{}/", closed_port())).unwrap();
        assert!(fetcher.get(&url).await.is_err());
    }
}
