//! Priority classification from chat-session signals.

use serde::{Deserialize, Serialize};

use super::first_matching_tag;
use crate::ticket::session::ChatSession;

/// Ticket urgency. Ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    /// One step more urgent, saturating at `Critical`
    pub fn increase(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Critical,
            Self::Critical => Self::Critical,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Tags that make a ticket critical regardless of anything else.
const CRITICAL_TAGS: &[&str] = &["security", "breach", "critical", "urgent"];

/// Tags that lift an otherwise calm ticket to medium.
const MEDIUM_TAGS: &[&str] = &["billing", "payment", "api", "integration"];

/// Classify a chat session's priority. First matching rule wins:
///
/// 1. critical tag → `Critical`
/// 2. human handoff or negative satisfaction → `High`
/// 3. billing/payment/api/integration tag → `Medium`
/// 4. otherwise `Low`
pub fn classify_priority(session: &ChatSession) -> Priority {
    if first_matching_tag(&session.tags, CRITICAL_TAGS).is_some() {
        return Priority::Critical;
    }

    if session.handoff_occurred || session.is_negative() {
        return Priority::High;
    }

    if first_matching_tag(&session.tags, MEDIUM_TAGS).is_some() {
        return Priority::Medium;
    }

    Priority::Low
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::session::{Platform, Satisfaction};

    fn session(tags: &[&str]) -> ChatSession {
        ChatSession::new("chat-1", "cust-1", "Ana", Platform::Web).with_tags(tags.iter().copied())
    }

    #[test]
    fn test_security_tag_is_critical() {
        assert_eq!(classify_priority(&session(&["security"])), Priority::Critical);
        assert_eq!(classify_priority(&session(&["other", "urgent"])), Priority::Critical);
    }

    #[test]
    fn test_critical_tag_beats_handoff() {
        let s = session(&["breach"]).with_handoff(true);
        assert_eq!(classify_priority(&s), Priority::Critical);
    }

    #[test]
    fn test_handoff_beats_billing() {
        let s = session(&["billing"]).with_handoff(true);
        assert_eq!(classify_priority(&s), Priority::High);
    }

    #[test]
    fn test_negative_satisfaction_is_high() {
        let s = session(&[]).with_satisfaction(Satisfaction::Negative);
        assert_eq!(classify_priority(&s), Priority::High);
    }

    #[test]
    fn test_billing_is_medium() {
        assert_eq!(classify_priority(&session(&["payment"])), Priority::Medium);
        assert_eq!(classify_priority(&session(&["API"])), Priority::Medium);
    }

    #[test]
    fn test_plain_session_is_low() {
        let s = session(&["shipping"]).with_satisfaction(Satisfaction::Positive);
        assert_eq!(classify_priority(&s), Priority::Low);
    }

    #[test]
    fn test_increase_saturates() {
        assert_eq!(Priority::Low.increase(), Priority::Medium);
        assert_eq!(Priority::High.increase(), Priority::Critical);
        let mut p = Priority::Critical;
        for _ in 0..10 {
            p = p.increase();
        }
        assert_eq!(p, Priority::Critical);
    }

    #[test]
    fn test_increase_is_monotonic() {
        for &p in Priority::all() {
            assert!(p.increase() >= p);
        }
    }
}
