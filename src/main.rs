//! # District News
//!
//! Aggregates news about one district from many syndicated feed queries,
//! keeps only items that are about the district and current, normalizes
//! them into a single language, and publishes a deduplicated JSON snapshot
//! on a fixed schedule.
//!
//! ## Usage
//!
//! ```sh
//! district_news -o ./news_data.json --interval-minutes 30
//! ```
//!
//! ## Architecture
//!
//! Each run follows a pipeline:
//! 1. **Retrieval**: Issue every configured feed query (failures are skipped)
//! 2. **Filtering**: Title dedup, keyword relevance, trusted-source bypass, recency
//! 3. **Normalization**: Plain-text description, thumbnail with logo fallback
//! 4. **Translation**: Detect language and translate into the target language
//! 5. **Output**: Atomically replace the JSON snapshot

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod aggregator;
mod cli;
mod config;
mod dates;
mod error;
mod feed;
mod filter;
mod html;
mod matcher;
mod models;
mod normalizer;
mod resolver;
mod scheduler;
mod store;
mod translate;
mod utils;

use aggregator::Aggregator;
use cli::Cli;
use config::PipelineConfig;
use dates::SystemClock;
use feed::GoogleNewsFeed;
use scheduler::Scheduler;
use store::JsonFileStore;
use translate::GoogleTranslate;
use utils::ensure_writable_parent;

#[tokio::main]
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

    info!(version = env!("CARGO_PKG_VERSION"), "district_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = PipelineConfig::load(args.config.as_deref())?;

    // Early check: the snapshot directory must be writable
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output.display(),
            error = %e,
            "Snapshot directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // Network clients are built once and reused by every run
    let feed = GoogleNewsFeed::new(&config.feed)?;
    let translator = GoogleTranslate::new(&config.translation)?;
    let store = JsonFileStore::new(&args.output);
    let mut aggregator = Aggregator::new(&config, feed, translator, store, SystemClock)?;
    info!(output = %aggregator.store().path().display(), "Pipeline ready");

    let scheduler = Scheduler::new(Duration::from_secs(args.interval_minutes * 60));
    let limit = args.once.then_some(1);
    scheduler.run(&mut aggregator, limit).await?;

    Ok(())
}
