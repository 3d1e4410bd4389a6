// src/config.rs
// =============================================================================
// Proxy settings for a batch.
//
// The defaults are the fixed local Tor-style endpoint: 127.0.0.1:9050, no
// credentials, host names resolved on the proxy side. The CLI can override
// the endpoint. Proxy authentication is not supported.
// =============================================================================

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Port the SOCKS5 proxy listens on by default
pub const DEFAULT_PROXY_PORT: u16 = 9050;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Where the SOCKS5 proxy listens
    pub addr: SocketAddr,
    /// Let the proxy resolve host names (socks5h://) instead of resolving locally
    pub remote_dns: bool,
    /// Open (and immediately close) a TCP connection to the proxy during setup
    /// so an absent proxy fails the batch before any URL is touched
    pub check_proxy: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, DEFAULT_PROXY_PORT)),
            remote_dns: true,
            check_proxy: true,
        }
    }
}

impl ProxyConfig {
    /// Builds a config for a specific endpoint, keeping the other defaults
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            addr,
            ..Self::default()
        }
    }

    /// The proxy URL in the form reqwest::Proxy expects
    ///
    /// Example: "socks5h://127.0.0.1:9050"
    pub fn proxy_url(&self) -> String {
        let scheme = if self.remote_dns { "socks5h" } else { "socks5" };
        format!("{}://{}", scheme, self.addr)
    }
}
