//! Ticket classifiers: deterministic keyword rules over chat-session signals.
//!
//! Priority and tier are independent axes: a `tier1` ticket can be
//! `critical` and a `tier3` ticket can be `low`.
//!
//! ```text
//! ChatSession ──┬──▶ classify_priority ──▶ Priority
//!               └──▶ classify_tier     ──▶ SupportTier
//! ```

pub mod priority;
pub mod tier;

pub use priority::{classify_priority, Priority};
pub use tier::classify_tier;

/// First tag that equals one of `keywords`, ignoring ASCII case
pub fn first_matching_tag<'a, S: AsRef<str>>(tags: &'a [S], keywords: &[&str]) -> Option<&'a str> {
    tags.iter().map(AsRef::as_ref).find(|tag| {
        let tag = tag.trim();
        keywords.iter().any(|kw| tag.eq_ignore_ascii_case(kw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_tag_ignores_case_and_padding() {
        let tags = vec!["Billing".to_string(), " SECURITY ".to_string()];
        assert_eq!(first_matching_tag(&tags, &["security"]), Some(" SECURITY "));
        assert_eq!(first_matching_tag(&tags, &["billing", "security"]), Some("Billing"));
        assert_eq!(first_matching_tag(&tags, &["api"]), None);
    }

    #[test]
    fn test_first_matching_tag_empty() {
        let tags: Vec<String> = Vec::new();
        assert_eq!(first_matching_tag(&tags, &["security"]), None);
    }
}
