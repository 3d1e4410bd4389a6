// src/checker/mod.rs
// =============================================================================
// This module contains the per-URL link checking pipeline.
//
// Submodules, in the order a URL passes through them:
// - validate: rejects anything that is not an http/https URL
// - http: GET through the SOCKS5 proxy
// - title: stream the body through html5ever's tokenizer and pick out <title>
// - report: classify the result into one pass/fail line
// =============================================================================

mod http;
mod report;
mod title;
mod validate;

pub use http::{
    Body, Connector, FetchError, FetchErrorKind, FetchedPage, Fetcher, ProxiedFetcher,
    SocksConnector,
};
pub use report::{passes, Outcome, Report, MAX_PASSING_STATUS, NOT_FOUND};
pub use title::{extract_title, TitleScanner};
pub use validate::{validate_url, InvalidUrl};
