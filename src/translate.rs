//! Language detection and translation.
//!
//! [`Translate`] is the capability the pipeline consumes; [`GoogleTranslate`]
//! implements it over the public `translate_a/single` endpoint. The
//! [`LanguageNormalizer`] wraps any translator and never fails: when
//! anything goes wrong it hands back the original text.

use crate::config::TranslationConfig;
use crate::error::TranslationError;
use crate::utils::{truncate_chars, truncate_for_log};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Detection and translation backend.
pub trait Translate {
    /// ISO 639-1 code of the dominant language of `text`.
    async fn detect(&self, text: &str) -> Result<String, TranslationError>;

    /// `text` rendered in `target_lang`.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError>;
}

/// Client for Google's unauthenticated translate endpoint.
///
/// Built once per process and shared across runs.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    client: Client,
    endpoint: String,
    /// Language requested when only detection is wanted.
    probe_lang: String,
}

impl GoogleTranslate {
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            probe_lang: config.target_language.clone(),
        })
    }

    async fn query(&self, text: &str, target_lang: &str) -> Result<Value, TranslationError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| TranslationError::Malformed(format!("{e}: {}", truncate_for_log(&body, 120))))
    }
}

impl Translate for GoogleTranslate {
    async fn detect(&self, text: &str) -> Result<String, TranslationError> {
        let value = self.query(text, &self.probe_lang).await?;
        detected_language(&value)
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
        let value = self.query(text, target_lang).await?;
        translated_text(&value)
    }
}

/// Element 2 of the response array is the detected source language.
fn detected_language(value: &Value) -> Result<String, TranslationError> {
    value
        .get(2)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TranslationError::Malformed("missing detected language".to_string()))
}

/// Element 0 is a list of `[translated, original, ...]` segments.
fn translated_text(value: &Value) -> Result<String, TranslationError> {
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::Malformed("missing translation segments".to_string()))?;
    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

/// Brings a title and description into the target language, or leaves
/// them untouched if detection or translation fails.
#[derive(Debug, Clone)]
pub struct LanguageNormalizer<T> {
    translator: T,
    target_language: String,
    description_limit: usize,
}

impl<T: Translate> LanguageNormalizer<T> {
    pub fn new(translator: T, target_language: impl Into<String>, description_limit: usize) -> Self {
        Self {
            translator,
            target_language: target_language.into(),
            description_limit,
        }
    }

    #[instrument(level = "debug", skip_all, fields(title = %truncate_for_log(&title, 40)))]
    pub async fn normalize_language(&self, title: String, description: String) -> (String, String) {
        let t0 = Instant::now();
        match self.try_normalize(&title, &description).await {
            Ok(Some(translated)) => {
                debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Translated item");
                translated
            }
            Ok(None) => (title, description),
            Err(e) => {
                warn!(error = %e, title = %truncate_for_log(&title, 60), "Translation failed; keeping original text");
                (title, description)
            }
        }
    }

    /// `Ok(None)` when the text is already in the target language.
    async fn try_normalize(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Option<(String, String)>, TranslationError> {
        let combined = format!("{title} {description}");
        let detected = self.translator.detect(combined.trim()).await?;
        if detected.eq_ignore_ascii_case(&self.target_language) {
            return Ok(None);
        }
        debug!(%detected, target = %self.target_language, "Translating item");

        let title = self.translator.translate(title, &self.target_language).await?;
        let excerpt = truncate_chars(description, self.description_limit);
        let description = if excerpt.trim().is_empty() {
            String::new()
        } else {
            self.translator.translate(excerpt, &self.target_language).await?
        };
        Ok(Some((title, description)))
    }
}
