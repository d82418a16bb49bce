//! Relevance and recency gate for raw feed entries.

use crate::config::RecencyPolicy;
use crate::dates::{self, Clock};
use crate::html::HtmlToText;
use crate::matcher::KeywordMatcher;
use crate::models::RawEntry;
use chrono::Duration;
use tracing::debug;

/// Why an entry was kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// Neither title nor description mentions the district.
    Irrelevant,
    /// Title leads with a different region (strict policy only).
    OtherRegion,
    /// Publication date is outside the recency window or unreadable.
    Stale,
}

/// Decides whether a raw entry belongs in the snapshot.
///
/// Trusted sources skip the keyword check but nothing else.
pub struct RelevanceFilter<H, C> {
    keywords: KeywordMatcher,
    exclusions: KeywordMatcher,
    trusted_sources: Vec<String>,
    policy: RecencyPolicy,
    html: H,
    clock: C,
}

impl<H: HtmlToText, C: Clock> RelevanceFilter<H, C> {
    pub fn new(
        keywords: KeywordMatcher,
        exclusions: KeywordMatcher,
        trusted_sources: Vec<String>,
        policy: RecencyPolicy,
        html: H,
        clock: C,
    ) -> Self {
        Self {
            keywords,
            exclusions,
            trusted_sources,
            policy,
            html,
            clock,
        }
    }

    /// Only [`Verdict::Accepted`] entries belong in the snapshot.
    pub fn accept(&self, entry: &RawEntry) -> Verdict {
        if !self.is_trusted(entry.source_label()) && !self.mentions_district(entry) {
            return Verdict::Irrelevant;
        }
        if self.policy == RecencyPolicy::Strict && self.led_by_other_region(&entry.title) {
            return Verdict::OtherRegion;
        }
        if !self.is_current(&entry.published) {
            return Verdict::Stale;
        }
        Verdict::Accepted
    }

    fn is_trusted(&self, source_label: &str) -> bool {
        !source_label.is_empty()
            && self
                .trusted_sources
                .iter()
                .any(|trusted| source_label.contains(trusted.as_str()))
    }

    fn mentions_district(&self, entry: &RawEntry) -> bool {
        // Title first; the summary only needs stripping when the title misses.
        self.keywords.is_relevant(&entry.title)
            || self.keywords.is_relevant(&self.html.strip(&entry.summary))
    }

    /// A title naming an excluded region is allowed only when a district
    /// keyword appears before the first excluded region.
    fn led_by_other_region(&self, title: &str) -> bool {
        let Some(other) = self.exclusions.first_mention(title) else {
            return false;
        };
        match self.keywords.first_mention(title) {
            Some(own) => own > other,
            None => true,
        }
    }

    fn is_current(&self, published: &str) -> bool {
        let parsed = dates::parse_lenient(published);
        let now = self.clock.now();
        match (self.policy, parsed) {
            (RecencyPolicy::Strict, Some(dt)) => dt.date_naive() == now.date_naive(),
            (RecencyPolicy::Strict, None) => {
                debug!(published, "Unparseable date under strict policy");
                false
            }
            (RecencyPolicy::Window { days }, Some(dt)) => dt >= now - Duration::days(i64::from(days)),
            (RecencyPolicy::Window { .. }, None) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::ScraperHtml;
    use chrono::{DateTime, Local, TimeZone};

    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn filter(policy: RecencyPolicy) -> RelevanceFilter<ScraperHtml, FixedClock> {
        RelevanceFilter::new(
            KeywordMatcher::new(&["Latur", "Ausa", "लातूर"]).unwrap(),
            KeywordMatcher::new(&["Pune", "पुणे"]).unwrap(),
            vec!["Latur Samachar".to_string(), "Aaj Latur".to_string()],
            policy,
            ScraperHtml,
            FixedClock(noon()),
        )
    }

    fn entry(title: &str, summary: &str, published: &str, source: &str) -> RawEntry {
        RawEntry {
            title: title.to_string(),
            link: "https://example.com".to_string(),
            published: published.to_string(),
            summary: summary.to_string(),
            source: Some(source.to_string()),
        }
    }

    fn today() -> String {
        noon().to_rfc2822()
    }

    fn days_ago(days: i64) -> String {
        (noon() - Duration::days(days)).to_rfc2822()
    }

    #[test]
    fn test_title_match_today_accepted() {
        let f = filter(RecencyPolicy::Strict);
        assert_eq!(
            f.accept(&entry("Latur Election Results", "", &today(), "Lokmat")),
            Verdict::Accepted
        );
    }

    #[test]
    fn test_description_match_accepted() {
        let f = filter(RecencyPolicy::Strict);
        let e = entry("Heavy rain", "<p>लातूरमध्ये जोरदार पाऊस</p>", &today(), "Lokmat");
        assert_eq!(f.accept(&e), Verdict::Accepted);
    }

    #[test]
    fn test_substring_of_latin_keyword_rejected() {
        let f = filter(RecencyPolicy::Strict);
        let e = entry("Causal inference workshop", "", &today(), "Lokmat");
        assert_eq!(f.accept(&e), Verdict::Irrelevant);
    }

    #[test]
    fn test_trusted_source_bypasses_keywords_not_recency() {
        let f = filter(RecencyPolicy::Strict);
        let fresh = entry("Water supply schedule", "", &today(), "Latur Samachar");
        assert_eq!(f.accept(&fresh), Verdict::Accepted);

        let old = entry("Water supply schedule", "", &days_ago(3), "Latur Samachar");
        assert_eq!(f.accept(&old), Verdict::Stale);
    }

    #[test]
    fn test_unparseable_date_rejected_under_strict() {
        let f = filter(RecencyPolicy::Strict);
        let e = entry("Latur news", "", "not a date", "Lokmat");
        assert_eq!(f.accept(&e), Verdict::Stale);
    }

    #[test]
    fn test_unparseable_date_allowed_under_window() {
        let f = filter(RecencyPolicy::Window { days: 3 });
        let e = entry("Latur news", "", "not a date", "Lokmat");
        assert_eq!(f.accept(&e), Verdict::Accepted);
    }

    #[test]
    fn test_window_policy_bounds() {
        let f = filter(RecencyPolicy::Window { days: 3 });
        assert_eq!(
            f.accept(&entry("Latur news", "", &days_ago(2), "Lokmat")),
            Verdict::Accepted
        );
        assert_eq!(
            f.accept(&entry("Latur news", "", &days_ago(5), "Lokmat")),
            Verdict::Stale
        );
    }

    #[test]
    fn test_yesterday_rejected_under_strict() {
        let f = filter(RecencyPolicy::Strict);
        assert_eq!(
            f.accept(&entry("Latur news", "", &days_ago(1), "Lokmat")),
            Verdict::Stale
        );
    }

    #[test]
    fn test_other_region_roundup_rejected_under_strict() {
        let f = filter(RecencyPolicy::Strict);
        let e = entry("Pune Budget Announced, Latur Gets Funds", "", &today(), "Lokmat");
        assert_eq!(f.accept(&e), Verdict::OtherRegion);

        let led = entry("Latur Gets Funds in Pune Budget", "", &today(), "Lokmat");
        assert_eq!(f.accept(&led), Verdict::Accepted);
    }

    #[test]
    fn test_other_region_only_in_title_with_district_in_description() {
        let f = filter(RecencyPolicy::Strict);
        let e = entry("Pune traffic update", "<p>Latur buses diverted</p>", &today(), "Lokmat");
        assert_eq!(f.accept(&e), Verdict::OtherRegion);
    }

    #[test]
    fn test_other_region_ignored_under_window() {
        let f = filter(RecencyPolicy::Window { days: 1 });
        let e = entry("Pune Budget Announced, Latur Gets Funds", "", &today(), "Lokmat");
        assert_eq!(f.accept(&e), Verdict::Accepted);
    }

    #[test]
    fn test_trusted_source_still_subject_to_other_region() {
        let f = filter(RecencyPolicy::Strict);
        let e = entry("पुणे-लातूर बस सेवा", "", &today(), "Latur Samachar");
        assert_eq!(f.accept(&e), Verdict::OtherRegion);

        let unrelated = entry("Pune metro timings", "", &today(), "Latur Samachar");
        assert_eq!(f.accept(&unrelated), Verdict::OtherRegion);

        let windowed = filter(RecencyPolicy::Window { days: 1 });
        assert_eq!(windowed.accept(&e), Verdict::Accepted);
    }
}
