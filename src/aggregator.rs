//! The run driver.
//!
//! One call to [`Aggregator::run`] is one full aggregation:
//!
//! 1. **Clear**: drop the previous snapshot so a crashed run never leaves
//!    stale data mixed with partial new data
//! 2. **Retrieve**: issue every configured query; a failing query is logged
//!    and skipped. Queries run concurrently but results are merged back in
//!    query order, so "first seen" is deterministic
//! 3. **Filter**: dedup by exact title, then relevance and recency
//! 4. **Normalize**: description, thumbnail, then language
//! 5. **Publish**: write the snapshot atomically
//!
//! `run` takes `&mut self`, so two runs on the same aggregator cannot overlap.

use crate::config::PipelineConfig;
use crate::dates::{Clock, SystemClock};
use crate::error::PersistenceError;
use crate::feed::FeedRetrieval;
use crate::filter::{RelevanceFilter, Verdict};
use crate::html::ScraperHtml;
use crate::matcher::KeywordMatcher;
use crate::models::{NewsItem, RawEntry, Snapshot};
use crate::normalizer::ItemNormalizer;
use crate::resolver::SourceResolver;
use crate::store::Store;
use crate::translate::{LanguageNormalizer, Translate};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub queries: usize,
    pub failed_queries: usize,
    pub entries: usize,
    pub duplicates: usize,
    pub irrelevant: usize,
    pub other_region: usize,
    pub stale: usize,
    pub published: usize,
}

pub struct Aggregator<F, T, S, C = SystemClock> {
    feed: F,
    store: S,
    queries: Vec<(String, String)>,
    fetch_concurrency: usize,
    filter: RelevanceFilter<ScraperHtml, C>,
    normalizer: ItemNormalizer<ScraperHtml>,
    language: LanguageNormalizer<T>,
    default_source: String,
}

impl<F, T, S, C> Aggregator<F, T, S, C>
where
    F: FeedRetrieval,
    T: Translate,
    S: Store,
    C: Clock,
{
    pub fn new(
        config: &PipelineConfig,
        feed: F,
        translator: T,
        store: S,
        clock: C,
    ) -> Result<Self, regex::Error> {
        let keywords = KeywordMatcher::new(&config.keywords)?;
        let exclusions = KeywordMatcher::new(&config.exclusion_regions)?;
        let filter = RelevanceFilter::new(
            keywords,
            exclusions,
            config.trusted_sources.clone(),
            config.recency,
            ScraperHtml,
            clock,
        );
        let normalizer = ItemNormalizer::new(
            ScraperHtml,
            SourceResolver::new(&config.domains),
            config.thumbnails.clone(),
        );
        let language = LanguageNormalizer::new(
            translator,
            config.translation.target_language.clone(),
            config.translation.description_limit,
        );
        let queries = config
            .queries
            .iter()
            .map(|q| (q.phrase(), config.feed.url_for(q)))
            .collect();

        Ok(Self {
            feed,
            store,
            queries,
            fetch_concurrency: config.feed.concurrency.max(1),
            filter,
            normalizer,
            language,
            default_source: config.default_source.clone(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Execute one aggregation run and publish its snapshot.
    ///
    /// Only persistence failures are returned; everything else degrades
    /// per query or per item.
    #[instrument(level = "info", skip_all, fields(queries = self.queries.len()))]
    pub async fn run(&mut self) -> Result<RunReport, PersistenceError> {
        let t0 = Instant::now();
        let mut report = RunReport {
            queries: self.queries.len(),
            ..RunReport::default()
        };

        self.store.clear().await?;

        let entries = self.retrieve(&mut report).await;
        report.entries = entries.len();
        debug!(entries = entries.len(), "Retrieved feed entries");

        let snapshot = self.assemble(entries, &mut report).await;
        report.published = snapshot.len();

        self.store.write(&snapshot).await?;

        let elapsed = t0.elapsed();
        info!(
            queries = report.queries,
            failed_queries = report.failed_queries,
            entries = report.entries,
            published = report.published,
            duplicates = report.duplicates,
            irrelevant = report.irrelevant,
            other_region = report.other_region,
            stale = report.stale,
            secs = elapsed.as_secs(),
            millis = elapsed.subsec_millis(),
            "Published snapshot"
        );
        Ok(report)
    }

    /// All entries from all queries, flattened in query order.
    async fn retrieve(&self, report: &mut RunReport) -> Vec<RawEntry> {
        let feed = &self.feed;
        let results: Vec<_> = stream::iter(self.queries.iter())
            .map(|(phrase, url)| async move { (phrase, feed.fetch(url).await) })
            .buffered(self.fetch_concurrency)
            .collect()
            .await;

        let mut entries = Vec::new();
        for (phrase, result) in results {
            match result {
                Ok(batch) => {
                    debug!(query = %phrase, count = batch.len(), "Fetched query");
                    entries.extend(batch);
                }
                Err(e) => {
                    report.failed_queries += 1;
                    warn!(query = %phrase, error = %e, "Query failed; skipping");
                }
            }
        }
        entries
    }

    async fn assemble(&self, entries: Vec<RawEntry>, report: &mut RunReport) -> Snapshot {
        let mut seen: HashSet<String> = HashSet::new();
        let mut published: HashSet<String> = HashSet::new();
        let mut snapshot = Vec::new();

        for entry in entries {
            if seen.contains(&entry.title) {
                report.duplicates += 1;
                continue;
            }
            match self.filter.accept(&entry) {
                Verdict::Accepted => {}
                Verdict::Irrelevant => {
                    report.irrelevant += 1;
                    continue;
                }
                Verdict::OtherRegion => {
                    report.other_region += 1;
                    debug!(title = %truncate_for_log(&entry.title, 80), "Skipping other-region headline");
                    continue;
                }
                Verdict::Stale => {
                    report.stale += 1;
                    continue;
                }
            }

            seen.insert(entry.title.clone());
            let item = self.build_item(entry).await;
            // Translation can map two distinct feed titles onto one.
            if !published.insert(item.title.clone()) {
                report.duplicates += 1;
                debug!(title = %truncate_for_log(&item.title, 80), "Skipping duplicate translated title");
                continue;
            }
            snapshot.push(item);
        }
        snapshot
    }

    async fn build_item(&self, entry: RawEntry) -> NewsItem {
        let normalized = self.normalizer.normalize(&entry);
        let (title, description) = self
            .language
            .normalize_language(entry.title, normalized.description)
            .await;
        let source = entry
            .source
            .unwrap_or_else(|| self.default_source.clone());

        NewsItem {
            title,
            link: entry.link,
            date: entry.published,
            image: normalized.image,
            is_logo: normalized.is_logo,
            source,
            description,
        }
    }
}
