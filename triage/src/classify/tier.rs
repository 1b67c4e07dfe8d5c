//! Initial support-tier selection from tag signals.
//!
//! ```text
//! security / enterprise / breach / critical   → tier3
//! api / integration / technical / developer   → tier2
//! anything else                               → tier1
//! ```

use super::first_matching_tag;
use crate::escalation::state::SupportTier;

/// Tags that need specialist handling from the start.
const SPECIALIST_TAGS: &[&str] = &["security", "enterprise", "breach", "critical"];

/// Tags that need technical support.
const TECHNICAL_TAGS: &[&str] = &["api", "integration", "technical", "developer"];

/// Classify the starting tier for a ticket with the given tags.
///
/// Never returns `Escalated`; that tier is only reachable by escalation.
pub fn classify_tier<S: AsRef<str>>(tags: &[S]) -> SupportTier {
    if first_matching_tag(tags, SPECIALIST_TAGS).is_some() {
        return SupportTier::Tier3;
    }

    if first_matching_tag(tags, TECHNICAL_TAGS).is_some() {
        return SupportTier::Tier2;
    }

    SupportTier::Tier1
}
