//! Per-entry normalization: plain-text description and thumbnail choice.

use crate::config::ThumbnailConfig;
use crate::html::HtmlToText;
use crate::models::RawEntry;
use crate::resolver::SourceResolver;

/// Description and thumbnail extracted from one feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub description: String,
    pub image: String,
    pub is_logo: bool,
}

/// Turns a [`RawEntry`] into display-ready fields.
///
/// Thumbnail resolution order:
/// 1. the first image embedded in the summary, unless it looks like a tracking pixel;
/// 2. a logo-service URL for the source's domain;
/// 3. the generic placeholder.
#[derive(Debug, Clone)]
pub struct ItemNormalizer<H> {
    html: H,
    resolver: SourceResolver,
    thumbnails: ThumbnailConfig,
}

impl<H: HtmlToText> ItemNormalizer<H> {
    pub fn new(html: H, resolver: SourceResolver, thumbnails: ThumbnailConfig) -> Self {
        Self {
            html,
            resolver,
            thumbnails,
        }
    }

    pub fn normalize(&self, entry: &RawEntry) -> Normalized {
        let description = self.html.strip(&entry.summary);

        if let Some(src) = self.html.find_first_image(&entry.summary) {
            if !self.is_tracking_pixel(&src) {
                return Normalized {
                    description,
                    image: src,
                    is_logo: false,
                };
            }
        }

        match self.resolver.resolve_domain(entry.source_label()) {
            Some(domain) => Normalized {
                description,
                image: format!("{}{}", self.thumbnails.logo_service, domain),
                is_logo: true,
            },
            None => Normalized {
                description,
                image: self.thumbnails.placeholder.clone(),
                is_logo: false,
            },
        }
    }

    fn is_tracking_pixel(&self, url: &str) -> bool {
        self.thumbnails
            .tracking_markers
            .iter()
            .any(|marker| url.contains(marker.as_str()))
    }
}
