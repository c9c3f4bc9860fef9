// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). Every option can also be
// set through an environment variable (the `env = ...` attributes), which is
// handy in containers and CI.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - value_parser: A function clap calls to validate and convert an argument
// =============================================================================

use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::Parser;
use url::Url;
use url_analyzer::config::{
    AnalyzerConfig, DEFAULT_CHECK_DEADLINE, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_IN_FLIGHT_PROBES,
};
use url_analyzer::logging::{LogFormat, LogLevel};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "url-analyzer",
    version,
    about = "Analyze a web page: HTML version, title, headings, links and login forms",
    long_about = "url-analyzer fetches a single web page and reports its HTML version, title, \
                  heading counts, internal and external links (including how many of them are \
                  unreachable) and whether it contains a login form."
)]
pub struct Cli {
    /// Page to analyze (must be an absolute http:// or https:// URL)
    ///
    /// Example: url-analyzer https://example.com
    #[arg(value_parser = parse_target_url)]
    pub url: String,

    /// Output the report as JSON instead of a table
    #[arg(long, env = "URL_ANALYZER_JSON")]
    pub json: bool,

    /// Exit with code 1 when any link on the page is inaccessible
    #[arg(long, env = "URL_ANALYZER_STRICT")]
    pub strict: bool,

    /// Timeout for fetching the page, in seconds
    #[arg(long, env = "URL_ANALYZER_FETCH_TIMEOUT", default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub fetch_timeout: u64,

    /// Deadline for checking all links on the page, in seconds
    #[arg(long, env = "URL_ANALYZER_CHECK_DEADLINE", default_value_t = DEFAULT_CHECK_DEADLINE.as_secs())]
    pub check_deadline: u64,

    /// Maximum number of link checks running at the same time
    #[arg(
        long,
        env = "URL_ANALYZER_MAX_IN_FLIGHT",
        default_value_t = DEFAULT_MAX_IN_FLIGHT_PROBES,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from)
    )]
    pub max_in_flight: usize,

    /// Minimum log level (RUST_LOG is read too, this flag wins)
    #[arg(long, env = "URL_ANALYZER_LOG_LEVEL", value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log line format
    #[arg(long, env = "URL_ANALYZER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Cli {
    // Turns the parsed flags into the library configuration
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig::default()
            .with_fetch_timeout(Duration::from_secs(self.fetch_timeout))
            .with_check_deadline(Duration::from_secs(self.check_deadline))
            .with_max_in_flight_probes(self.max_in_flight)
    }
}

// Accepts only absolute http/https URLs
//
// Other schemes (ftp:, file:, ...) make no sense for a page fetch, so we
// reject them here, before the analyzer ever sees them.
fn parse_target_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL '{}': {}", raw, e))?;

    match url.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(format!(
            "unsupported scheme '{}', please use http or https",
            other
        )),
    }
}
