//! Escalation State: support tiers, escalation records and triggers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Support tiers in the escalation ladder
///
/// Ordering follows the ladder, so `Tier1 < Tier2 < Tier3 < Escalated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportTier {
    /// Frontline support
    Tier1,
    /// Technical support (API, integrations)
    Tier2,
    /// Specialists (security, enterprise)
    Tier3,
    /// Management escalation, terminal
    Escalated,
}

impl SupportTier {
    /// All tiers in ladder order
    pub fn all() -> &'static [SupportTier] {
        &[Self::Tier1, Self::Tier2, Self::Tier3, Self::Escalated]
    }

    /// Next tier on the ladder. `Escalated` maps to itself.
    pub fn next(self) -> Self {
        match self {
            Self::Tier1 => Self::Tier2,
            Self::Tier2 => Self::Tier3,
            Self::Tier3 => Self::Escalated,
            Self::Escalated => Self::Escalated,
        }
    }

    /// Whether no further transition exists
    pub fn is_terminal(self) -> bool {
        self == Self::Escalated
    }
}

impl std::fmt::Display for SupportTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tier1 => write!(f, "tier1"),
            Self::Tier2 => write!(f, "tier2"),
            Self::Tier3 => write!(f, "tier3"),
            Self::Escalated => write!(f, "escalated"),
        }
    }
}

/// Record of an escalation event. Appended to a ticket, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketEscalation {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Tier before the transition
    pub from_tier: SupportTier,
    /// Tier after the transition
    pub to_tier: SupportTier,
    pub reason: String,
    /// Actor that requested the escalation (agent id, "system", ...)
    pub escalated_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TicketEscalation {
    pub fn new(
        from_tier: SupportTier,
        to_tier: SupportTier,
        request: &EscalationRequest,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("esc-{}", uuid::Uuid::new_v4()),
            timestamp,
            from_tier,
            to_tier,
            reason: request.reason.clone(),
            escalated_by: request.escalated_by.clone(),
            notes: request.notes.clone(),
        }
    }

    /// Whether the tier actually moved (false once the ladder is exhausted)
    pub fn changed_tier(&self) -> bool {
        self.from_tier != self.to_tier
    }
}

/// Caller-supplied parameters for an escalation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRequest {
    pub reason: String,
    pub escalated_by: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EscalationRequest {
    pub fn new(reason: impl Into<String>, escalated_by: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            escalated_by: escalated_by.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A condition that fired during escalation evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EscalationTrigger {
    /// Ticket outlived the age limit of its tier
    AgeExceeded {
        tier: SupportTier,
        age_minutes: i64,
        limit_minutes: i64,
    },
    /// Knowledge-base confidence too low for frontline handling
    LowConfidence { confidence: f64, threshold: f64 },
    /// Ticket carries a tag that frontline may not own
    SensitiveTag { tag: String },
    /// Customer left the chat unhappy
    NegativeSatisfaction,
}

impl std::fmt::Display for EscalationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgeExceeded {
                tier,
                age_minutes,
                limit_minutes,
            } => write!(
                f,
                "open {}m at {} (limit {}m)",
                age_minutes, tier, limit_minutes
            ),
            Self::LowConfidence {
                confidence,
                threshold,
            } => write!(
                f,
                "ai confidence {:.2} below {:.2}",
                confidence, threshold
            ),
            Self::SensitiveTag { tag } => write!(f, "sensitive tag '{}'", tag),
            Self::NegativeSatisfaction => write!(f, "negative customer satisfaction"),
        }
    }
}
