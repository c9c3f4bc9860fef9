// src/analyzer.rs
// =============================================================================
// The page analysis pipeline:
//
//   fetch page -> parse HTML -> extract structure -> check links -> report
//
// An Analyzer holds the shared HTTP client and the configuration and can be
// reused for any number of analyses (it is Clone + Send + Sync). Each call to
// analyze_page starts from an empty report and its own link checker, so
// nothing carries over between analyses except pooled connections.
// =============================================================================

use std::time::Instant;

use log::info;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::checker::{LinkChecker, LinkTally};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::page::{build_client, extract_structure, fetch_page, parse_document};
use crate::report::AnalysisReport;

#[derive(Debug, Clone)]
pub struct Analyzer {
    client: Client,
    config: AnalyzerConfig,
}

impl Analyzer {
    // Uses an existing client, e.g. one shared with other parts of a program
    pub fn new(client: Client, config: AnalyzerConfig) -> Self {
        Self { client, config }
    }

    // Validates the configuration and builds the shared client from it
    pub fn from_config(config: AnalyzerConfig) -> Result<Self, AnalyzeError> {
        config.validate()?;
        let client = build_client(&config)?;
        Ok(Self::new(client, config))
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    // Analyzes one page
    //
    // `raw_url` is expected to be an absolute http(s) URL; checking that is
    // the caller's job. Link failures never fail the analysis, they only
    // show up in the inaccessible counters.
    pub async fn analyze_page(&self, raw_url: &str) -> Result<AnalysisReport, AnalyzeError> {
        self.analyze_page_until(raw_url, CancellationToken::new())
            .await
    }

    // Like analyze_page, but `cancel` can cut the link-checking phase short
    pub async fn analyze_page_until(
        &self,
        raw_url: &str,
        cancel: CancellationToken,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let start = Instant::now();

        let base = Url::parse(raw_url).map_err(|source| AnalyzeError::InvalidBaseUrl {
            url: raw_url.to_string(),
            source,
        })?;

        let page = fetch_page(&self.client, raw_url, self.config.fetch_timeout).await?;

        let (mut report, links) = inspect_document(&page.body, &base)?;
        info!(
            "Extracted page structure url={} links={} headings={}",
            raw_url,
            links.len(),
            report.headings.total()
        );

        let checker = LinkChecker::new(
            self.client.clone(),
            self.config.max_in_flight_probes,
            self.config.check_deadline,
        );
        let tally = checker.check_links_until(&links, &base, cancel).await;

        apply_link_tally(&mut report, tally);
        report.elapsed_seconds = start.elapsed().as_secs_f64();
        report.url = raw_url.to_string();

        info!(
            "Analyzed page url={} elapsed={:.3}s",
            raw_url, report.elapsed_seconds
        );
        Ok(report)
    }
}

// Parses the body and walks it once
//
// Kept synchronous on purpose: the parsed tree is not Send, so it must be
// gone before the next .await in analyze_page.
fn inspect_document(
    body: &[u8],
    base: &Url,
) -> Result<(AnalysisReport, Vec<String>), AnalyzeError> {
    let document = parse_document(body)?;

    let mut report = AnalysisReport::default();
    let mut links = Vec::new();
    extract_structure(&document, base, &mut report, &mut links);

    Ok((report, links))
}

fn apply_link_tally(report: &mut AnalysisReport, tally: LinkTally) {
    report.internal_links = tally.internal;
    report.external_links = tally.external;
    report.inaccessible_internal_links = tally.inaccessible_internal;
    report.inaccessible_external_links = tally.inaccessible_external;
}
