// src/error.rs
// =============================================================================
// Errors that abort a page analysis.
//
// Only page-level problems live here. A broken link on the page is not an
// error: the link checker absorbs it into the inaccessible counters and the
// analysis still produces a full report.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[source]: keeps the underlying cause available for error chains
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    // DNS failure, refused connection, timeout before the response arrived...
    #[error("failed to perform request: {0}")]
    Fetch(#[source] reqwest::Error),

    // The page answered, but with a 4xx/5xx status
    #[error("HTTP error {status} {}: the URL is unreachable or returned an error", reason(.status))]
    RemoteHttp { status: u16 },

    #[error("failed to parse the HTML document: {0}")]
    MalformedDocument(String),

    #[error("failed to parse URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl AnalyzeError {
    // True when the remote side is at fault (unreachable or error status)
    // rather than the input or this process.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AnalyzeError::Fetch(_) | AnalyzeError::RemoteHttp { .. })
    }

    // Conventional status for an HTTP layer sitting on top of the analyzer:
    // 502 when the target page failed us, 500 for everything else.
    pub fn status_hint(&self) -> u16 {
        if self.is_upstream() {
            StatusCode::BAD_GATEWAY.as_u16()
        } else {
            StatusCode::INTERNAL_SERVER_ERROR.as_u16()
        }
    }
}

fn reason(status: &u16) -> &'static str {
    StatusCode::from_u16(*status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown Status")
}
