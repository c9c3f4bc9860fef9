// src/page/fetch.rs
// =============================================================================
// Downloads the page we are asked to analyze.
//
// One GET request per analysis. The shared reqwest Client (built once in
// build_client) keeps a connection pool, so repeated analyses against the
// same host reuse connections, and the link checker probes through the same
// pool.
//
// Rust concepts:
// - async/await: network I/O without blocking the thread
// - map_err: turning library errors into our own error type
// =============================================================================

use std::time::Duration;

use log::{debug, error, warn};
use reqwest::Client;

use super::headers::browser_headers;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;

/// A successfully downloaded page: final status and the complete body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: Vec<u8>,
}

// Builds the HTTP client shared by the fetcher and the link checker
//
// The client-level timeout bounds every request made through it, link probes
// included; the link checker adds its own overall deadline on top.
pub fn build_client(config: &AnalyzerConfig) -> Result<Client, AnalyzeError> {
    Client::builder()
        .timeout(config.fetch_timeout)
        .redirect(reqwest::redirect::Policy::limited(config.redirect_limit))
        .build()
        .map_err(AnalyzeError::Client)
}

// Fetches a page and returns its body
//
// Errors:
//   AnalyzeError::Fetch       - the request never got a response (DNS, refused, timeout)
//   AnalyzeError::RemoteHttp  - the server answered with status >= 400
//
// The body is read to the end in every branch, error statuses included:
// hyper only returns a connection to the pool once its body is finished.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<FetchedPage, AnalyzeError> {
    let response = client
        .get(url)
        .headers(browser_headers())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            error!("HTTP request failed url={} error={}", url, e);
            AnalyzeError::Fetch(e)
        })?;

    let status = response.status().as_u16();
    if status >= 400 {
        warn!("Non-OK HTTP response url={} status={}", url, status);
        let _ = response.bytes().await;
        return Err(AnalyzeError::RemoteHttp { status });
    }

    let body = response.bytes().await.map_err(|e| {
        error!("Failed to read response body url={} error={}", url, e);
        AnalyzeError::Fetch(e)
    })?;

    debug!("Fetched page url={} status={} bytes={}", url, status, body.len());

    Ok(FetchedPage {
        status,
        body: body.to_vec(),
    })
}
