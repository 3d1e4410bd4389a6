// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   link-warden https://example.com https://example.org
//   link-warden --input urls.txt --json
//   link-warden --proxy 127.0.0.1:9150 https://example.com
// =============================================================================

use clap::Parser;
use link_warden::config::DEFAULT_PROXY_PORT;
use link_warden::ProxyConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-warden",
    version,
    about = "Check URLs for reachability and page titles through a local SOCKS5 proxy",
    long_about = "link-warden fetches each URL through a SOCKS5 proxy (Tor's 127.0.0.1:9050 by default) \
                  and prints one line per URL: the status code and page title when it is reachable, \
                  the status code and URL when it is not. URLs are checked one at a time, in order."
)]
pub struct Cli {
    /// URLs to check, in order
    pub urls: Vec<String>,

    /// Read more URLs from a file (one per line, '#' starts a comment)
    ///
    /// File entries are checked before positional URLs
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Address of the SOCKS5 proxy
    #[arg(
        long,
        value_name = "ADDR",
        env = "LINK_WARDEN_PROXY",
        default_value_t = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PROXY_PORT))
    )]
    pub proxy: SocketAddr,

    /// Resolve host names locally instead of on the proxy (socks5:// instead of socks5h://)
    #[arg(long)]
    pub local_dns: bool,

    /// Skip the proxy reachability check before the first request
    #[arg(long)]
    pub skip_proxy_check: bool,

    /// Output one JSON object per URL instead of colored lines
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show debug logs on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            addr: self.proxy,
            remote_dns: !self.local_dns,
            check_proxy: !self.skip_proxy_check,
        }
    }
}
