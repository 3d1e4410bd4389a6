// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and gather the URL list
// 3. Run one batch through the SOCKS5 proxy
// 4. Exit with proper code (0 = batch done, 1 = proxy setup failed, 2 = error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use link_warden::output::{ConsoleSink, JsonSink, ReportSink};
use link_warden::{input, logging, LinkChecker};
use std::sync::Arc;
use tracing::warn;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Bad arguments, unreadable input file and the like
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;
    execute(&cli).await
}

// Everything after argument parsing and logging setup
async fn execute(cli: &Cli) -> Result<i32> {
    let urls = input::collect_urls(cli.input.as_deref(), &cli.urls)?;
    if urls.is_empty() {
        // Still a batch: the proxy is set up and the run completes with 0
        warn!("no URLs to check (pass them as arguments or with --input)");
    }

    let sink: Arc<dyn ReportSink> = if cli.json {
        Arc::new(JsonSink)
    } else {
        Arc::new(ConsoleSink::detect(cli.no_color))
    };

    let checker = LinkChecker::with_proxy(cli.proxy_config(), sink);
    Ok(checker.run(&urls).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn cli_for_proxy(proxy: &str) -> Cli {
        Cli::try_parse_from(["link-warden", "--proxy", proxy, "--json"]).unwrap()
    }

    #[tokio::test]
    async fn test_empty_url_list_exits_zero() {
        let proxy = TcpListener::bind("127.0.0.1:0").unwrap();
        let cli = cli_for_proxy(&proxy.local_addr().unwrap().to_string());

        assert_eq!(execute(&cli).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_url_list_with_dead_proxy_exits_one() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let cli = cli_for_proxy(&addr.to_string());

        assert_eq!(execute(&cli).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_input_file_is_an_error() {
        let cli = Cli::try_parse_from(["link-warden", "--input", "/nonexistent/urls.txt"]).unwrap();
        assert!(execute(&cli).await.is_err());
    }
}
