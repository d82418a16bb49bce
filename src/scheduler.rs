//! Fixed-interval run loop.
//!
//! The first run starts immediately, then one run per interval from a single
//! loop. A run that overruns the interval delays the next tick instead of
//! queuing missed ones.

use crate::aggregator::{Aggregator, RunReport};
use crate::dates::Clock;
use crate::error::PersistenceError;
use crate::feed::FeedRetrieval;
use crate::store::Store;
use crate::translate::Translate;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, instrument};

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    every: Duration,
}

impl Scheduler {
    pub fn new(every: Duration) -> Self {
        Self { every }
    }

    /// Run `limit` times, or forever when `limit` is `None`.
    ///
    /// A failed run is logged and the loop carries on to the next tick.
    /// Returns the outcome of the last run.
    #[instrument(level = "info", skip_all, fields(every_secs = self.every.as_secs()))]
    pub async fn run<F, T, S, C>(
        &self,
        aggregator: &mut Aggregator<F, T, S, C>,
        limit: Option<u64>,
    ) -> Result<RunReport, PersistenceError>
    where
        F: FeedRetrieval,
        T: Translate,
        S: Store,
        C: Clock,
    {
        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut runs = 0u64;
        loop {
            ticker.tick().await;
            runs += 1;
            info!(run = runs, "Checking for news from all sources");

            let outcome = aggregator.run().await;
            match &outcome {
                Ok(report) => info!(run = runs, published = report.published, "Run finished"),
                Err(e) => error!(run = runs, error = %e, "Run failed; snapshot not published"),
            }

            if limit.is_some_and(|limit| runs >= limit) {
                return outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::dates::SystemClock;
    use crate::error::{RetrievalError, TranslationError};
    use crate::models::{NewsItem, RawEntry};
    use std::cell::Cell;
    use std::time::Instant;

    struct EmptyFeed;

    impl FeedRetrieval for EmptyFeed {
        async fn fetch(&self, _url: &str) -> Result<Vec<RawEntry>, RetrievalError> {
            Ok(Vec::new())
        }
    }

    struct NoTranslate;

    impl Translate for NoTranslate {
        async fn detect(&self, _text: &str) -> Result<String, TranslationError> {
            Ok("mr".to_string())
        }

        async fn translate(&self, text: &str, _target: &str) -> Result<String, TranslationError> {
            Ok(text.to_string())
        }
    }

    #[derive(Default)]
    struct CountingStore {
        writes: Cell<u32>,
    }

    impl Store for CountingStore {
        async fn clear(&self) -> Result<(), PersistenceError> {
            Ok(())
        }

        async fn write(&self, _items: &[NewsItem]) -> Result<(), PersistenceError> {
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_runs_immediately_then_on_interval() {
        let config = PipelineConfig::builtin().unwrap();
        let mut agg = Aggregator::new(
            &config,
            EmptyFeed,
            NoTranslate,
            CountingStore::default(),
            SystemClock,
        )
        .unwrap();

        let every = Duration::from_millis(20);
        let t0 = Instant::now();
        let report = Scheduler::new(every).run(&mut agg, Some(3)).await.unwrap();

        assert_eq!(report.published, 0);
        assert_eq!(report.queries, config.queries.len());
        // First tick is immediate, so three runs span two intervals.
        assert!(t0.elapsed() >= every * 2);
        assert_eq!(agg_writes(&agg), 3);
    }

    fn agg_writes(agg: &Aggregator<EmptyFeed, NoTranslate, CountingStore, SystemClock>) -> u32 {
        agg.store().writes.get()
    }
}
