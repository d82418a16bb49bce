//! Feed retrieval.
//!
//! [`FeedRetrieval`] is what the aggregator consumes. [`GoogleNewsFeed`]
//! fetches an RSS 2.0 search feed over HTTP and maps its `<item>`s to
//! [`RawEntry`] values. Google News names the publishing outlet in a
//! `<source url="...">Label</source>` child, which becomes the source label.

use crate::config::FeedConfig;
use crate::error::RetrievalError;
use crate::models::RawEntry;
use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Fetches and parses one fully formed feed URL.
pub trait FeedRetrieval {
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, RetrievalError>;
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    source: Option<Source>,
}

#[derive(Debug, Deserialize)]
struct Source {
    #[serde(rename = "$text", default)]
    label: String,
}

impl From<Item> for RawEntry {
    fn from(item: Item) -> Self {
        RawEntry {
            title: item.title.unwrap_or_default().trim().to_string(),
            link: item.link.unwrap_or_default().trim().to_string(),
            published: item.pub_date.unwrap_or_default().trim().to_string(),
            summary: item.description.unwrap_or_default(),
            source: item
                .source
                .map(|s| s.label.trim().to_string())
                .filter(|label| !label.is_empty()),
        }
    }
}

/// Parse an RSS 2.0 document into entries, in document order.
///
/// Items without a title are dropped; they cannot be deduplicated or shown.
pub fn parse_rss(xml: &str) -> Result<Vec<RawEntry>, RetrievalError> {
    let rss: Rss = from_str(xml)?;
    Ok(rss
        .channel
        .items
        .into_iter()
        .map(RawEntry::from)
        .filter(|entry| !entry.title.is_empty())
        .collect())
}

/// Google News RSS search client.
#[derive(Debug, Clone)]
pub struct GoogleNewsFeed {
    client: Client,
}

impl GoogleNewsFeed {
    pub fn new(config: &FeedConfig) -> Result<Self, RetrievalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl FeedRetrieval for GoogleNewsFeed {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, RetrievalError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        let entries = parse_rss(&body)?;
        debug!(
            count = entries.len(),
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Parsed feed"
        );
        Ok(entries)
    }
}
