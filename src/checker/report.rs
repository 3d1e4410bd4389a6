// src/checker/report.rs
// =============================================================================
// Turns the outcome of one URL into a single report line.
//
// Classification, first match wins:
// 1. URL failed validation    -> fail, synthetic 404, no title
// 2. Transport error          -> fail, no status code exists
// 3. Status code above 300    -> fail, code + URL
// 4. Status code 300 or below -> pass, code + title (URL not shown)
// =============================================================================

use serde::Serialize;

use super::http::{FetchError, FetchErrorKind};
use super::validate::InvalidUrl;
use crate::output::Severity;

/// Code reported for entries that never reached the network
pub const NOT_FOUND: u16 = 404;

/// Highest status code that still counts as a pass
pub const MAX_PASSING_STATUS: u16 = 300;

/// Whether a received status code is a pass
pub fn passes(status: u16) -> bool {
    status <= MAX_PASSING_STATUS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Invalid { code: u16, reason: String },
    TransportError { kind: FetchErrorKind, message: String },
    Failed { code: u16 },
    Passed { code: u16, title: String },
}

// The terminal result for one URL entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// The URL exactly as it was given
    pub url: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Report {
    pub fn invalid(url: &str, reason: &InvalidUrl) -> Self {
        Self {
            url: url.to_string(),
            outcome: Outcome::Invalid {
                code: NOT_FOUND,
                reason: reason.to_string(),
            },
        }
    }

    pub fn transport_error(url: &str, error: &FetchError) -> Self {
        Self {
            url: url.to_string(),
            outcome: Outcome::TransportError {
                kind: error.kind,
                message: error.message.clone(),
            },
        }
    }

    pub fn failed(url: &str, code: u16) -> Self {
        Self {
            url: url.to_string(),
            outcome: Outcome::Failed { code },
        }
    }

    pub fn passed(url: &str, code: u16, title: String) -> Self {
        Self {
            url: url.to_string(),
            outcome: Outcome::Passed { code, title },
        }
    }

    pub fn severity(&self) -> Severity {
        match self.outcome {
            Outcome::Passed { .. } => Severity::Pass,
            _ => Severity::Fail,
        }
    }

    /// Status code shown on the line; None for transport errors
    pub fn code(&self) -> Option<u16> {
        match self.outcome {
            Outcome::Invalid { code, .. } | Outcome::Failed { code } | Outcome::Passed { code, .. } => {
                Some(code)
            }
            Outcome::TransportError { .. } => None,
        }
    }

    /// The formatted report line (without color)
    ///
    /// Examples:
    ///   "[200] Example Domain"
    ///   "[404] https://example.com/missing"
    ///   "[ERR] https://down.example (connection failed)"
    pub fn line(&self) -> String {
        match &self.outcome {
            Outcome::Passed { code, title } => format!("[{}] {}", code, title),
            Outcome::Invalid { code, .. } | Outcome::Failed { code } => {
                format!("[{}] {}", code, self.url)
            }
            Outcome::TransportError { kind, .. } => {
                format!("[ERR] {} ({})", self.url, kind.describe())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::validate::validate_url;

    #[test]
    fn test_pass_boundary_is_300() {
        assert!(passes(200));
        assert!(passes(300));
        assert!(!passes(301));
        assert!(!passes(404));
    }

    #[test]
    fn test_pass_line_shows_code_and_title_only() {
        let report = Report::passed("https://example.com", 200, "Example".to_string());
        assert_eq!(report.severity(), Severity::Pass);
        assert_eq!(report.line(), "[200] Example");
        assert!(!report.line().contains("example.com"));
    }

    #[test]
    fn test_failed_line_shows_code_and_url() {
        let report = Report::failed("https://example.com/gone", 404);
        assert_eq!(report.severity(), Severity::Fail);
        assert_eq!(report.line(), "[404] https://example.com/gone");
    }

    #[test]
    fn test_invalid_uses_synthetic_not_found() {
        let reason = validate_url("ftp://example.com").unwrap_err();
        let report = Report::invalid("ftp://example.com", &reason);
        assert_eq!(report.code(), Some(NOT_FOUND));
        assert_eq!(report.severity(), Severity::Fail);
        assert_eq!(report.line(), "[404] ftp://example.com");
    }

    #[test]
    fn test_transport_error_has_no_code() {
        let error = FetchError::new(FetchErrorKind::Connect, "connection refused");
        let report = Report::transport_error("http://down.test", &error);
        assert_eq!(report.code(), None);
        assert_eq!(report.severity(), Severity::Fail);
        assert_eq!(report.line(), "[ERR] http://down.test (connection failed)");
    }

    #[test]
    fn test_json_shape() {
        let report = Report::passed("https://example.com", 200, "Example".to_string());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com",
                "outcome": "passed",
                "code": 200,
                "title": "Example",
            })
        );
    }
}
