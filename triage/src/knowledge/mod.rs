//! Knowledge base lookup.
//!
//! Entries are a read-only snapshot owned by the knowledge-base store. The
//! matcher returns copies whose `confidence` carries the per-query match
//! score; nothing is written back.

pub mod matcher;
pub mod samples;

use serde::{Deserialize, Serialize};

pub use matcher::{mean_confidence, KnowledgeBaseMatcher, MatcherConfig};
pub use samples::sample_entries;

/// A stored solution article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Confidence in `[0, 1]`. On matcher output this is the query score.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub usage_count: u64,
}

impl KnowledgeBaseEntry {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            confidence: 0.0,
            usage_count: 0,
        }
    }

    /// Lower-cased title, content and tags joined by spaces
    pub fn searchable_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.content.len() + self.tags.len() * 12 + 2,
        );
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.content);
        text.push(' ');
        text.push_str(&self.tags.join(" "));
        text.to_lowercase()
    }
}

/// Source of the current knowledge-base snapshot
pub trait KnowledgeSource: Send + Sync {
    fn entries(&self) -> Vec<KnowledgeBaseEntry>;
}

/// Fixed snapshot of entries
#[derive(Debug, Clone, Default)]
pub struct StaticKnowledgeBase {
    entries: Vec<KnowledgeBaseEntry>,
}

impl StaticKnowledgeBase {
    pub fn new(entries: Vec<KnowledgeBaseEntry>) -> Self {
        Self { entries }
    }

    /// Built-in sample articles
    pub fn samples() -> Self {
        Self::new(sample_entries())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KnowledgeSource for StaticKnowledgeBase {
    fn entries(&self) -> Vec<KnowledgeBaseEntry> {
        self.entries.clone()
    }
}
