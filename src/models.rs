//! Data models for feed entries and the published snapshot.
//!
//! - [`RawEntry`]: one item as returned by a feed query, consumed once per run
//! - [`NewsItem`]: one normalized, translated record in the snapshot
//! - [`Snapshot`]: the ordered output of a single run

use serde::{Deserialize, Serialize};

/// An unprocessed item returned by feed retrieval.
///
/// The summary is HTML and the published date is whatever string the
/// source chose to emit; both are interpreted later in the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    /// Headline as published by the feed.
    pub title: String,
    /// Link to the article (often a feed redirect).
    pub link: String,
    /// Publication date, loosely formatted.
    pub published: String,
    /// HTML summary.
    pub summary: String,
    /// Human-readable label of the publishing outlet, if the feed has one.
    pub source: Option<String>,
}

impl RawEntry {
    /// The source label, or an empty string when the feed did not name one.
    pub fn source_label(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }
}

/// A record in the published snapshot.
///
/// `title` is unique within one snapshot. `date` is the feed's original
/// string, kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub date: String,
    pub image: String,
    /// True when `image` is a brand mark rather than an article thumbnail.
    #[serde(default)]
    pub is_logo: bool,
    pub source: String,
    pub description: String,
}

/// The full output of one run, in acceptance order.
pub type Snapshot = Vec<NewsItem>;

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> NewsItem {
        NewsItem {
            title: "लातूरमध्ये पाऊस".to_string(),
            link: "https://example.com/a".to_string(),
            date: "Mon, 19 Oct 2026 06:00:00 GMT".to_string(),
            image: "https://logo.clearbit.com/lokmat.com".to_string(),
            is_logo: true,
            source: "Lokmat".to_string(),
            description: "पाऊस".to_string(),
        }
    }

    #[test]
    fn test_news_item_field_names() {
        let json = serde_json::to_value(item()).unwrap();
        for field in ["title", "link", "date", "image", "is_logo", "source", "description"] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn test_news_item_without_is_logo_deserializes() {
        let json = r#"{
            "title": "Latur",
            "link": "https://example.com",
            "date": "today",
            "image": "https://via.placeholder.com/300x200",
            "source": "News Portal",
            "description": ""
        }"#;
        let parsed: NewsItem = serde_json::from_str(json).unwrap();
        assert!(!parsed.is_logo);
        assert_eq!(parsed.source, "News Portal");
    }

    #[test]
    fn test_source_label_defaults_to_empty() {
        let entry = RawEntry::default();
        assert_eq!(entry.source_label(), "");

        let entry = RawEntry {
            source: Some("Lokmat".to_string()),
            ..RawEntry::default()
        };
        assert_eq!(entry.source_label(), "Lokmat");
    }
}
