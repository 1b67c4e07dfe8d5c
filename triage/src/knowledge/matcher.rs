//! Keyword-overlap matcher.
//!
//! ```text
//! keywords  = lowercase(words(description)) ∪ lowercase(tags)
//! score(e)  = |{k ∈ keywords : len(k) ≥ min_keyword_len ∧ text(e) ⊇ k}| / |keywords|
//! ```
//!
//! Short keywords still count in the denominator, so filler words dilute
//! the score. An empty keyword set scores 0 everywhere.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::KnowledgeBaseEntry;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Entries must score strictly above this to be suggested
    pub min_score: f64,
    /// Maximum suggestions returned
    pub max_suggestions: usize,
    /// Keywords shorter than this never count as hits
    pub min_keyword_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_score: 0.5,
            max_suggestions: 3,
            min_keyword_len: 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseMatcher {
    config: MatcherConfig,
}

impl KnowledgeBaseMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Distinct lower-cased keywords from the description words and the tags
    pub fn keywords<S: AsRef<str>>(description: &str, tags: &[S]) -> BTreeSet<String> {
        description
            .split_whitespace()
            .map(str::to_lowercase)
            .chain(
                tags.iter()
                    .map(|t| t.as_ref().trim().to_lowercase())
                    .filter(|t| !t.is_empty()),
            )
            .collect()
    }

    /// Fraction of keywords found in the entry, in `[0, 1]`
    pub fn match_score(&self, keywords: &BTreeSet<String>, entry: &KnowledgeBaseEntry) -> f64 {
        if keywords.is_empty() {
            return 0.0;
        }
        let text = entry.searchable_text();
        let hits = keywords
            .iter()
            .filter(|k| k.chars().count() >= self.config.min_keyword_len && text.contains(k.as_str()))
            .count();
        (hits as f64 / keywords.len() as f64).clamp(0.0, 1.0)
    }

    /// Best entries for the query, highest score first.
    ///
    /// Each returned entry's `confidence` is its score for this query. Ties
    /// keep snapshot order.
    pub fn find_matches<S: AsRef<str>>(
        &self,
        description: &str,
        tags: &[S],
        entries: &[KnowledgeBaseEntry],
    ) -> Vec<KnowledgeBaseEntry> {
        let keywords = Self::keywords(description, tags);
        if keywords.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<KnowledgeBaseEntry> = entries
            .iter()
            .filter_map(|entry| {
                let score = self.match_score(&keywords, entry);
                (score > self.config.min_score).then(|| KnowledgeBaseEntry {
                    confidence: score,
                    ..entry.clone()
                })
            })
            .collect();

        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        matches.truncate(self.config.max_suggestions);

        debug!(
            keywords = keywords.len(),
            candidates = entries.len(),
            matched = matches.len(),
            "Knowledge base matched"
        );
        matches
    }
}

/// Arithmetic mean of suggestion confidences, 0 for none
pub fn mean_confidence(suggestions: &[KnowledgeBaseEntry]) -> f64 {
    if suggestions.is_empty() {
        return 0.0;
    }
    suggestions.iter().map(|s| s.confidence).sum::<f64>() / suggestions.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::sample_entries;

    #[test]
    fn test_keywords_union_dedupes() {
        let kw = KnowledgeBaseMatcher::keywords("Billing billing ISSUE", &["billing", " Refund "]);
        let expected: BTreeSet<String> = ["billing", "issue", "refund"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(kw, expected);
    }

    #[test]
    fn test_empty_keywords_score_zero() {
        let matcher = KnowledgeBaseMatcher::new();
        let empty = BTreeSet::new();
        for entry in sample_entries() {
            let score = matcher.match_score(&empty, &entry);
            assert_eq!(score, 0.0);
            assert!(!score.is_nan());
        }
        let none: [&str; 0] = [];
        assert!(matcher.find_matches("   ", &none, &sample_entries()).is_empty());
    }

    #[test]
    fn test_short_keywords_dilute_but_never_hit() {
        let matcher = KnowledgeBaseMatcher::new();
        let entry = KnowledgeBaseEntry::new("kb", "on my way", "an ox", &[]);
        let kw = KnowledgeBaseMatcher::keywords("on my ox way", &[] as &[&str]);
        // only "way" is long enough to count
        assert_eq!(matcher.match_score(&kw, &entry), 0.25);
    }

    #[test]
    fn test_scores_bounded() {
        let matcher = KnowledgeBaseMatcher::new();
        let entries = sample_entries();
        let queries = [
            ("double charged on my invoice", vec!["billing"]),
            ("password reset link expired", vec!["account"]),
            ("api webhook returns 500", vec!["api", "integration"]),
            ("a b c", vec![]),
        ];
        for (desc, tags) in &queries {
            let kw = KnowledgeBaseMatcher::keywords(desc, &tags[..]);
            for entry in &entries {
                let score = matcher.match_score(&kw, entry);
                assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
            }
        }
    }

    #[test]
    fn test_billing_query_ranks_refund_first() {
        let matcher = KnowledgeBaseMatcher::new();
        let matches =
            matcher.find_matches("double charged on my invoice", &["billing"], &sample_entries());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "kb-billing-refund");
        assert!((matches[0].confidence - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_matches_sorted_and_truncated() {
        let matcher = KnowledgeBaseMatcher::new();
        let entries: Vec<_> = (0..5)
            .map(|i| {
                let content = if i % 2 == 0 { "alpha beta gamma" } else { "alpha beta" };
                KnowledgeBaseEntry::new(format!("kb-{}", i), "entry", content, &[])
            })
            .collect();
        let matches = matcher.find_matches("alpha beta gamma", &[] as &[&str], &entries);
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].id, "kb-0");
        assert_eq!(matches[1].id, "kb-2");
        assert_eq!(matches[2].id, "kb-4");
        assert!(matches.iter().all(|m| m.confidence == 1.0));
    }

    #[test]
    fn test_threshold_is_strict() {
        let matcher = KnowledgeBaseMatcher::new();
        let entry = KnowledgeBaseEntry::new("kb", "alpha", "", &[]);
        // 1 hit out of 2 keywords = 0.5, not above 0.5
        let matches = matcher.find_matches("alpha omega", &[] as &[&str], &[entry]);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_input_entries_untouched() {
        let matcher = KnowledgeBaseMatcher::new();
        let entries = sample_entries();
        let before = entries.clone();
        let _ = matcher.find_matches("double charged on my invoice", &["billing"], &entries);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_mean_confidence() {
        assert_eq!(mean_confidence(&[]), 0.0);
        let mut a = KnowledgeBaseEntry::new("a", "", "", &[]);
        let mut b = a.clone();
        a.confidence = 0.6;
        b.confidence = 1.0;
        assert!((mean_confidence(&[a, b]) - 0.8).abs() < 1e-9);
    }
}
