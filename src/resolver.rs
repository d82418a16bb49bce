//! Source label to domain resolution for logo fallback.

use crate::config::DomainEntry;

/// Read-only registry of outlet labels and their canonical domains.
///
/// Lookup is exact first. Failing that, the first entry (in declaration
/// order) whose label occurs case-insensitively inside the source label wins.
#[derive(Debug, Clone, Default)]
pub struct SourceResolver {
    entries: Vec<(String, String, String)>,
}

impl SourceResolver {
    pub fn new(domains: &[DomainEntry]) -> Self {
        let entries = domains
            .iter()
            .map(|d| (d.label.clone(), d.label.to_lowercase(), d.domain.clone()))
            .collect();
        Self { entries }
    }

    pub fn resolve_domain(&self, source_label: &str) -> Option<&str> {
        if source_label.is_empty() {
            return None;
        }
        if let Some((_, _, domain)) = self.entries.iter().find(|(label, _, _)| label == source_label) {
            return Some(domain.as_str());
        }
        let lowered = source_label.to_lowercase();
        self.entries
            .iter()
            .find(|(_, key, _)| lowered.contains(key.as_str()))
            .map(|(_, _, domain)| domain.as_str())
    }
}
