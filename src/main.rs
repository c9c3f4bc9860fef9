// src/main.rs
// =============================================================================
// This is the entry point of url-analyzer.
//
// The real work lives in the library (src/lib.rs and friends); this file
// only parses the command line, sets up logging, runs one analysis and
// prints the result.
//
// Exit codes:
//   0 = report produced
//   1 = report produced, but --strict was given and some links are inaccessible
//   2 = the page could not be analyzed (bad URL, fetch failure, HTTP error...)
//
// Rust concepts:
// - async/await: Writing asynchronous code that looks synchronous
// - #[tokio::main]: Sets up the async runtime
// - anyhow::Result + context: error propagation with readable messages
// =============================================================================

mod cli; // src/cli.rs - command-line parsing

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use log::error;
use url_analyzer::logging::init_logger;
use url_analyzer::{AnalysisReport, Analyzer};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_logger(cli.log_level.into(), cli.log_format).context("Failed to initialize logger")?;

    let analyzer = Analyzer::from_config(cli.analyzer_config())?;

    if !cli.json {
        println!("🔍 Analyzing page: {}", cli.url);
    }

    let report = match analyzer.analyze_page(&cli.url).await {
        Ok(report) => report,
        Err(e) => {
            error!(
                "Failed to analyze page url={} error={} status_hint={}",
                cli.url,
                e,
                e.status_hint()
            );
            eprintln!("❌ {}", e);
            return Ok(2);
        }
    };

    print_report(&report, cli.json)?;

    if cli.strict && report.inaccessible_links() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn print_report(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &AnalysisReport) {
    let version = report
        .document_version
        .map(|v| v.as_str())
        .unwrap_or("unknown");
    let title = if report.page_title.is_empty() {
        "(none)"
    } else {
        report.page_title.as_str()
    };
    let h = &report.headings;

    println!();
    println!("{:<28} {}", "URL", report.url);
    println!("{}", "=".repeat(70));
    println!("{:<28} {}", "HTML version", version);
    println!("{:<28} {}", "Page title", title);
    println!(
        "{:<28} h1={} h2={} h3={} h4={} h5={} h6={}",
        "Headings", h.h1, h.h2, h.h3, h.h4, h.h5, h.h6
    );
    println!(
        "{:<28} {} ({} inaccessible)",
        "Internal links", report.internal_links, report.inaccessible_internal_links
    );
    println!(
        "{:<28} {} ({} inaccessible)",
        "External links", report.external_links, report.inaccessible_external_links
    );
    println!(
        "{:<28} {}",
        "Login form",
        if report.login_form_detected { "yes" } else { "no" }
    );
    println!();

    println!("📊 Summary:");
    println!("   🔗 Links: {}", report.total_links());
    println!("   ❌ Inaccessible: {}", report.inaccessible_links());
    println!("   ⏱️  Time: {:.2}s", report.elapsed_seconds);
}
