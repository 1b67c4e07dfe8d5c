//! Ticket lifecycle events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Priority;
use crate::escalation::state::SupportTier;

/// All ticket lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TicketEvent {
    /// A ticket was built from a finished chat
    TicketCreated {
        ticket_id: String,
        chat_session_id: String,
        priority: Priority,
        tier: SupportTier,
        suggestions: usize,
        timestamp: DateTime<Utc>,
    },

    /// An agent slot was committed for a ticket
    TicketAssigned {
        ticket_id: String,
        agent_id: String,
        tier: SupportTier,
        timestamp: DateTime<Utc>,
    },

    /// No agent had capacity at the ticket's tier
    TicketUnassigned {
        ticket_id: String,
        tier: SupportTier,
        timestamp: DateTime<Utc>,
    },

    /// A ticket moved up the escalation ladder
    TicketEscalated {
        ticket_id: String,
        from_tier: SupportTier,
        to_tier: SupportTier,
        priority: Priority,
        reason: String,
        escalated_by: String,
        timestamp: DateTime<Utc>,
    },

    /// An agent's slot was given back after reassignment
    AgentReleased {
        ticket_id: String,
        agent_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl TicketEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TicketCreated { .. } => "ticket_created",
            Self::TicketAssigned { .. } => "ticket_assigned",
            Self::TicketUnassigned { .. } => "ticket_unassigned",
            Self::TicketEscalated { .. } => "ticket_escalated",
            Self::AgentReleased { .. } => "agent_released",
        }
    }

    pub fn ticket_id(&self) -> &str {
        match self {
            Self::TicketCreated { ticket_id, .. }
            | Self::TicketAssigned { ticket_id, .. }
            | Self::TicketUnassigned { ticket_id, .. }
            | Self::TicketEscalated { ticket_id, .. }
            | Self::AgentReleased { ticket_id, .. } => ticket_id.as_str(),
        }
    }

    pub fn agent_id(&self) -> Option<&str> {
        match self {
            Self::TicketAssigned { agent_id, .. } | Self::AgentReleased { agent_id, .. } => {
                Some(agent_id.as_str())
            }
            _ => None,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::TicketCreated { timestamp, .. }
            | Self::TicketAssigned { timestamp, .. }
            | Self::TicketUnassigned { timestamp, .. }
            | Self::TicketEscalated { timestamp, .. }
            | Self::AgentReleased { timestamp, .. } => *timestamp,
        }
    }
}
