//! Ticket aggregate.
//!
//! Engine-maintained invariants:
//! - `tier` only moves forward along the ladder
//! - `escalations` is append-only; each record's `from_tier`/`to_tier`
//!   bracket the transition it describes
//! - `ai_confidence` is the mean of `ai_suggestions[].confidence` (0 if none)
//! - `sla_deadline` = (creation or latest escalation time) + SLA hours of
//!   the priority in force at that moment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Priority;
use crate::escalation::sla::SlaPolicy;
use crate::escalation::state::{SupportTier, TicketEscalation};
use crate::knowledge::KnowledgeBaseEntry;
use crate::ticket::session::Platform;

/// Ticket workflow status. Only `Open` is set by the engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Pending,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Whether the ticket is still being worked and may escalate
    pub fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::InProgress | Self::Pending)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Pending => write!(f, "pending"),
            Self::Resolved => write!(f, "resolved"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketSource {
    Chat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub tier: SupportTier,
    pub source: TicketSource,
    pub platform: Platform,
    pub customer_id: String,
    pub customer_name: String,
    #[serde(default)]
    pub assigned_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub ai_suggestions: Vec<KnowledgeBaseEntry>,
    #[serde(default)]
    pub ai_confidence: f64,
    #[serde(default)]
    pub ai_attempted: bool,
    #[serde(default)]
    pub escalations: Vec<TicketEscalation>,
    pub chat_session_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sla_deadline: DateTime<Utc>,
    /// Minutes from creation to first agent response
    #[serde(default)]
    pub response_time_minutes: Option<i64>,
}

impl Ticket {
    /// Open, unassigned tier1/low ticket with default SLA
    pub fn new(chat_session_id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_ticket_id(),
            title: String::new(),
            description: String::new(),
            status: TicketStatus::Open,
            priority: Priority::Low,
            tier: SupportTier::Tier1,
            source: TicketSource::Chat,
            platform: Platform::Web,
            customer_id: String::new(),
            customer_name: String::new(),
            assigned_agent: None,
            created_at,
            updated_at: created_at,
            ai_suggestions: Vec::new(),
            ai_confidence: 0.0,
            ai_attempted: false,
            escalations: Vec::new(),
            chat_session_id: chat_session_id.into(),
            tags: Vec::new(),
            sla_deadline: SlaPolicy::default().deadline(Priority::Low, created_at),
            response_time_minutes: None,
        }
    }

    pub fn escalation_count(&self) -> usize {
        self.escalations.len()
    }

    pub fn last_escalation(&self) -> Option<&TicketEscalation> {
        self.escalations.last()
    }

    /// Start of the current SLA window
    pub fn sla_reference_time(&self) -> DateTime<Utc> {
        self.last_escalation()
            .map(|e| e.timestamp)
            .unwrap_or(self.created_at)
    }

    pub fn is_sla_breached(&self, now: DateTime<Utc>) -> bool {
        self.response_time_minutes.is_none() && now > self.sla_deadline
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_agent.is_some()
    }

    /// Record the first agent response. Later calls are ignored.
    pub fn record_response(&mut self, at: DateTime<Utc>) {
        if self.response_time_minutes.is_some() {
            return;
        }
        self.response_time_minutes = Some((at - self.created_at).num_minutes().max(0));
        self.updated_at = at;
    }
}

pub fn new_ticket_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("TKT-{}", id[..12].to_uppercase())
}
