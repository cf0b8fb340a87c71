//! CLI entry point for the listing-photos tool.

use anyhow::{Context, Result};
use clap::Parser;
use listing_photos_core::{HttpClient, RunOutcome, run_with_client};
use tracing::{debug, info};

mod cli;
mod output;

use cli::Args;
use output::ConsoleReporter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn).
    // Progress lines go through the console reporter, not the log.
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = args.scrape_config();
    let policy = args.site_policy();
    let reporter = ConsoleReporter::new(args.quiet);
    reporter.banner(&config.page_url, &config.output_dir, config.workers);

    let client = HttpClient::try_new().context("failed to build HTTP client")?;
    let outcome = run_with_client(&client, &config, &policy, &reporter).await?;

    match outcome {
        RunOutcome::NothingFound => info!("run finished without images"),
        RunOutcome::Completed(report) => info!(
            saved = report.saved(),
            failed = report.failed(),
            total = report.total(),
            "run finished"
        ),
    }

    Ok(())
}
