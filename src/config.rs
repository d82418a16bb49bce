//! Pipeline configuration.
//!
//! Everything that describes *which* district is being followed lives here:
//! feed queries, keyword vocabularies, the trusted-source allow-list, the
//! domain registry used for logo fallback, and the recency policy. The
//! configuration is read once at startup from YAML, either from a file
//! passed on the command line or from the built-in Latur profile.

use crate::error::ConfigError;
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

/// The district profile compiled into the binary.
const BUILTIN_PROFILE: &str = include_str!("../config/latur.yaml");

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub feed: FeedConfig,
    pub queries: Vec<Query>,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exclusion_regions: Vec<String>,
    #[serde(default)]
    pub trusted_sources: Vec<String>,
    #[serde(default)]
    pub domains: Vec<DomainEntry>,
    #[serde(default)]
    pub recency: RecencyPolicy,
    pub translation: TranslationConfig,
    pub thumbnails: ThumbnailConfig,
    #[serde(default = "default_source")]
    pub default_source: String,
}

/// Feed search endpoint and its locale parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// URL template with `{query}`, `{hl}`, `{gl}` and `{ceid}` placeholders.
    pub endpoint: String,
    pub hl: String,
    pub gl: String,
    pub ceid: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Queries in flight at once. Results are still merged in query order.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

/// One feed search: a topic, optionally limited to a site and a recency window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Query {
    pub topic: String,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub window: Option<String>,
}

impl Query {
    /// Search phrase as the feed search engine expects it,
    /// e.g. `site:lokmat.com Latur when:1d`.
    pub fn phrase(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(site) = &self.site {
            parts.push(format!("site:{site}"));
        }
        parts.push(self.topic.clone());
        if let Some(window) = &self.window {
            parts.push(format!("when:{window}"));
        }
        parts.join(" ")
    }
}

impl FeedConfig {
    /// Full, URL-escaped feed URL for `query`.
    pub fn url_for(&self, query: &Query) -> String {
        self.endpoint
            .replace("{query}", &urlencoding::encode(&query.phrase()))
            .replace("{hl}", &self.hl)
            .replace("{gl}", &self.gl)
            .replace("{ceid}", &self.ceid)
    }
}

/// Source label to canonical domain, consulted in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainEntry {
    pub label: String,
    pub domain: String,
}

/// How "current" is decided for an entry's publication date.
///
/// The two variants are mutually exclusive. `Strict` also enables the
/// other-region title exclusion; `Window` never applies it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum RecencyPolicy {
    /// Same local calendar day as now; unparseable dates are rejected.
    #[default]
    Strict,
    /// Within the last `days` days; unparseable dates are let through.
    Window { days: u32 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    /// ISO 639-1 code every published item is normalized to.
    pub target_language: String,
    pub endpoint: String,
    /// Characters of description sent for translation.
    #[serde(default = "default_description_limit")]
    pub description_limit: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThumbnailConfig {
    /// Prefix the resolved domain is appended to.
    pub logo_service: String,
    pub placeholder: String,
    #[serde(default = "default_tracking_markers")]
    pub tracking_markers: Vec<String>,
}

fn default_source() -> String {
    "News Portal".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    4
}

fn default_description_limit() -> usize {
    500
}

fn default_tracking_markers() -> Vec<String> {
    vec!["tracker".to_string(), "pixel".to_string()]
}

impl PipelineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// The Latur profile shipped with the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_PROFILE)
    }

    /// Load from `path` when given, otherwise fall back to the built-in profile.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_yaml(&yaml)?
            }
            None => Self::builtin()?,
        };
        info!(
            queries = config.queries.len(),
            keywords = config.keywords.len(),
            trusted = config.trusted_sources.len(),
            domains = config.domains.len(),
            recency = ?config.recency,
            "Loaded pipeline configuration"
        );
        Ok(config)
    }

    /// Reject empty vocabularies, duplicated entries, and endpoints that
    /// cannot take a query.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queries.is_empty() {
            return Err(ConfigError::Empty("queries"));
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Empty("keywords"));
        }
        if self.translation.target_language.trim().is_empty() {
            return Err(ConfigError::Empty("translation.target_language"));
        }

        no_duplicates("queries", self.queries.iter().map(Query::phrase))?;
        no_duplicates("keywords", self.keywords.iter().map(|k| k.to_lowercase()))?;
        no_duplicates(
            "exclusion_regions",
            self.exclusion_regions.iter().map(|r| r.to_lowercase()),
        )?;
        no_duplicates("trusted_sources", self.trusted_sources.iter().cloned())?;
        no_duplicates("domains", self.domains.iter().map(|d| d.label.clone()))?;

        for (field, list) in [
            ("keywords", &self.keywords),
            ("exclusion_regions", &self.exclusion_regions),
            ("trusted_sources", &self.trusted_sources),
        ] {
            if list.iter().any(|entry| entry.trim().is_empty()) {
                return Err(ConfigError::Empty(field));
            }
        }

        if !self.feed.endpoint.contains("{query}") {
            return Err(ConfigError::Endpoint(format!(
                "`{}` has no {{query}} placeholder",
                self.feed.endpoint
            )));
        }
        let sample = self.feed.url_for(&self.queries[0]);
        url::Url::parse(&sample).map_err(|e| ConfigError::Endpoint(format!("{sample}: {e}")))?;

        Ok(())
    }
}

fn no_duplicates(
    field: &'static str,
    values: impl Iterator<Item = String>,
) -> Result<(), ConfigError> {
    match values.duplicates().next() {
        Some(value) => Err(ConfigError::Duplicate { field, value }),
        None => Ok(()),
    }
}
