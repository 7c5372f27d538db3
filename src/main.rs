//! # Master RSS
//!
//! Aggregates Polish financial news listings (Bankier.pl, PAP Biznes) into
//! JSON Feed and RSS documents.
//!
//! ## Usage
//!
//! ```sh
//! master_rss --output docs
//! master_rss --output docs --mode per-source --source bankier
//! ```
//!
//! ## Architecture
//!
//! The application follows a sequential pipeline:
//! 1. **Paging**: walk a fixed number of listing pages per source, pausing
//!    after every request
//! 2. **Extraction**: turn each page into articles with the extractor bound to
//!    its listing
//! 3. **Aggregation**: deduplicate by link, drop articles outside the
//!    retention window, order newest first
//! 4. **Output**: merge sources into one JSON feed, or write RSS + JSON per
//!    source

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod error;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::{Cli, Mode};
use config::AppConfig;
use fetch::{FetchSettings, ReqwestFetcher};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("master_rss starting up");

    let args = Cli::parse();
    debug!(?args.output, %args.source, ?args.mode, "Parsed CLI arguments");

    let config = AppConfig::load(args.config.as_deref())?;
    let sources = config.select(&args.source)?;
    let settings = &config.settings;

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output).await {
        error!(
            path = %args.output.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = ReqwestFetcher::new(FetchSettings {
        timeout: settings.request_timeout(),
        delay: settings.request_delay(),
    })?;

    // One clock reading for the whole run keeps the window consistent.
    let now = dates::now_civil();
    let retention = settings.retention();
    info!(%now, hours_back = settings.hours_back, sources = sources.len(), mode = ?args.mode, "Collecting articles");

    let mut failed_outputs = 0usize;
    match args.mode {
        Mode::Combined => {
            let mut per_source = Vec::with_capacity(sources.len());
            for source in &sources {
                per_source.push(pipeline::collect_source(&fetcher, source, now, retention).await?);
            }
            let articles = pipeline::merge_sources(per_source);

            if let Err(e) = outputs::write_combined(&args.output, &sources, settings, &articles).await {
                error!(error = %e, "Failed to write combined feed");
                failed_outputs += 1;
            }
        }
        Mode::PerSource => {
            for source in &sources {
                let articles = pipeline::collect_source(&fetcher, source, now, retention).await?;
                if let Err(e) = outputs::write_source(&args.output, source, settings, &articles).await {
                    error!(source = %source.key, error = %e, "Failed to write source feeds");
                    failed_outputs += 1;
                }
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        failed_outputs,
        "Execution complete"
    );

    if failed_outputs > 0 {
        return Err(format!("{failed_outputs} output(s) could not be written").into());
    }
    Ok(())
}
