// src/checker/validate.rs
// =============================================================================
// Syntactic URL validation.
//
// A URL entry is accepted when it parses as a URL and its scheme is exactly
// http or https. Nothing here touches the network; a rejected entry is
// reported as not-found without any request being made.
// =============================================================================

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum InvalidUrl {
    #[error("cannot parse '{input}': {source}")]
    Unparseable {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme '{0}' (only http and https are checked)")]
    UnsupportedScheme(String),
}

// Parses a URL entry, keeping only http/https
//
// Examples:
//   "https://example.com"  -> Ok(Url)
//   "ftp://example.com"    -> Err(UnsupportedScheme)
//   "not a url"            -> Err(Unparseable)
pub fn validate_url(input: &str) -> Result<Url, InvalidUrl> {
    let url = Url::parse(input).map_err(|source| InvalidUrl::Unparseable {
        input: input.to_string(),
        source,
    })?;

    // The url crate lowercases the scheme while parsing
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(InvalidUrl::UnsupportedScheme(other.to_string())),
    }
}
