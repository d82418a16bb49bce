//! Keyword matching for district relevance.
//!
//! Latin-script keywords are matched on word boundaries so that short place
//! names do not fire inside unrelated words ("Ausa" in "Causal"). Keywords in
//! other scripts are matched as plain substrings so that inflected forms
//! ("लातूरमध्ये", "लातूरचा") still count. Both comparisons ignore case.

use regex::Regex;

#[derive(Debug, Clone)]
enum Pattern {
    Bounded(Regex),
    Substring(String),
}

/// A compiled keyword vocabulary.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<Pattern>,
}

impl KeywordMatcher {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let mut patterns = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() {
                continue;
            }
            let lowered = keyword.to_lowercase();
            if keyword.is_ascii() {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&lowered)))?;
                patterns.push(Pattern::Bounded(re));
            } else {
                patterns.push(Pattern::Substring(lowered));
            }
        }
        Ok(Self { patterns })
    }

    /// Whether `text` mentions any keyword. Empty text never matches.
    pub fn is_relevant(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        self.patterns.iter().any(|p| p.find_in(&lowered).is_some())
    }

    /// Byte offset of the earliest keyword mention in the lowercased `text`.
    ///
    /// Offsets from two matchers are comparable when both are given the
    /// same input.
    pub fn first_mention(&self, text: &str) -> Option<usize> {
        if text.is_empty() {
            return None;
        }
        let lowered = text.to_lowercase();
        self.patterns.iter().filter_map(|p| p.find_in(&lowered)).min()
    }
}

impl Pattern {
    fn find_in(&self, lowered: &str) -> Option<usize> {
        match self {
            Pattern::Bounded(re) => re.find(lowered).map(|m| m.start()),
            Pattern::Substring(needle) => lowered.find(needle.as_str()),
        }
    }
}
