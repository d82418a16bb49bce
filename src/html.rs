//! HTML helpers for feed summaries.
//!
//! Feed summaries arrive as HTML fragments. The pipeline only needs two
//! things from them: the visible text and the first embedded image.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());

/// Markup-to-text capability used by the normalizer and the relevance filter.
pub trait HtmlToText {
    /// Visible text of `markup`, with every tag removed.
    fn strip(&self, markup: &str) -> String;

    /// `src` of the first `<img>` in `markup`, if any.
    fn find_first_image(&self, markup: &str) -> Option<String>;
}

/// [`HtmlToText`] backed by the `scraper` HTML parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperHtml;

impl HtmlToText for ScraperHtml {
    fn strip(&self, markup: &str) -> String {
        if markup.is_empty() {
            return String::new();
        }
        let fragment = Html::parse_fragment(markup);
        fragment.root_element().text().collect::<String>()
    }

    fn find_first_image(&self, markup: &str) -> Option<String> {
        if markup.is_empty() {
            return None;
        }
        let fragment = Html::parse_fragment(markup);
        fragment
            .select(&IMG_SELECTOR)
            .filter_map(|img| img.value().attr("src"))
            .map(str::trim)
            .find(|src| !src.is_empty())
            .map(str::to_string)
    }
}
