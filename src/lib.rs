// src/lib.rs
// =============================================================================
// url-analyzer: fetch one web page and report on its structure.
//
// The report covers the HTML version, the page title, heading counts,
// internal/external links (and how many of them are unreachable), and
// whether the page contains a login form.
//
// Typical use:
//
//     let analyzer = Analyzer::from_config(AnalyzerConfig::default())?;
//     let report = analyzer.analyze_page("https://example.com").await?;
//     println!("{} links", report.total_links());
//
// Modules:
// - analyzer: the pipeline tying everything together
// - page: fetching, parsing and walking the page
// - checker: link classification and reachability probes
// - report: the output types
// - config, error, logging: settings, error types, logger setup
// =============================================================================

pub mod analyzer;
pub mod checker;
pub mod config;
pub mod error;
pub mod logging;
pub mod page;
pub mod report;

pub use analyzer::Analyzer;
pub use config::{AnalyzerConfig, ConfigError};
pub use error::AnalyzeError;
pub use report::{AnalysisReport, DocumentVersion, Headings};
