//! Ticket Orchestrator: composes classification, knowledge-base lookup,
//! agent assignment, SLA stamping and escalation.
//!
//! ```text
//! ChatSession ─▶ classify_priority ─┐
//!             ─▶ classify_tier ─────┤
//!             ─▶ title/description ─┼─▶ KnowledgeBaseMatcher ─▶ AgentSelector
//!                                   │        (snapshot)           │ try_assign (atomic)
//!                                   └────────────── SlaPolicy ◀───┘
//!                                                      │
//!                                                      ▼
//!                                                   Ticket
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::agents::{AgentSelector, SharedAgentDirectory};
use crate::classify::{classify_priority, classify_tier};
use crate::config::{EngineConfig, TextLimits};
use crate::error::{TriageError, TriageResult};
use crate::escalation::{
    EscalationEngine, EscalationRequest, EscalationTrigger, SlaPolicy, SupportTier,
};
use crate::events::{SharedEventBus, TicketEvent};
use crate::knowledge::{mean_confidence, KnowledgeBaseMatcher, KnowledgeSource};
use crate::ticket::session::{ChatSession, MessageSender};
use crate::ticket::text::{generate_description, generate_title};
use crate::ticket::types::{new_ticket_id, Ticket, TicketSource, TicketStatus};

/// Shared reference to TicketOrchestrator
pub type SharedTicketOrchestrator = Arc<TicketOrchestrator>;

pub struct TicketOrchestrator {
    directory: SharedAgentDirectory,
    knowledge: Arc<dyn KnowledgeSource>,
    matcher: KnowledgeBaseMatcher,
    selector: AgentSelector,
    escalation: EscalationEngine,
    sla: SlaPolicy,
    text: TextLimits,
    events: Option<SharedEventBus>,
}

impl TicketOrchestrator {
    /// Create an orchestrator with default configuration
    pub fn new(directory: SharedAgentDirectory, knowledge: Arc<dyn KnowledgeSource>) -> Self {
        Self::with_config(directory, knowledge, &EngineConfig::default())
    }

    pub fn with_config(
        directory: SharedAgentDirectory,
        knowledge: Arc<dyn KnowledgeSource>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            directory,
            knowledge,
            matcher: KnowledgeBaseMatcher::with_config(config.matcher),
            selector: AgentSelector::new(config.selection),
            escalation: EscalationEngine::with_config(config.escalation.clone(), config.sla),
            sla: config.sla,
            text: config.text,
            events: None,
        }
    }

    /// Publish lifecycle events on `bus`
    pub fn with_event_bus(mut self, bus: SharedEventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn shared(self) -> SharedTicketOrchestrator {
        Arc::new(self)
    }

    pub fn escalation_engine(&self) -> &EscalationEngine {
        &self.escalation
    }

    pub fn directory(&self) -> &SharedAgentDirectory {
        &self.directory
    }

    /// Build a ticket from a finished chat session.
    ///
    /// Fails only for a malformed session. No KB match or no free agent
    /// yields empty suggestions or an unassigned ticket.
    pub fn create_ticket_from_chat(&self, session: &ChatSession) -> TriageResult<Ticket> {
        self.create_ticket_from_chat_at(session, Utc::now())
    }

    pub fn create_ticket_from_chat_at(
        &self,
        session: &ChatSession,
        now: DateTime<Utc>,
    ) -> TriageResult<Ticket> {
        session.validate()?;

        let priority = classify_priority(session);
        let tier = classify_tier(&session.tags);
        let title = generate_title(session, &self.text);
        let description = generate_description(session, &self.text);

        let entries = self.knowledge.entries();
        let ai_suggestions = self
            .matcher
            .find_matches(&description, &session.tags, &entries);
        let ai_confidence = mean_confidence(&ai_suggestions);
        let ai_attempted = session
            .messages
            .iter()
            .any(|m| m.sender == MessageSender::Bot);

        let id = new_ticket_id();
        let assigned_agent = self.assign_agent(&id, tier, &session.tags);

        let ticket = Ticket {
            id,
            title,
            description,
            status: TicketStatus::Open,
            priority,
            tier,
            source: TicketSource::Chat,
            platform: session.platform,
            customer_id: session.customer_id.clone(),
            customer_name: session.customer_name.clone(),
            assigned_agent,
            created_at: now,
            updated_at: now,
            ai_suggestions,
            ai_confidence,
            ai_attempted,
            escalations: Vec::new(),
            chat_session_id: session.id.clone(),
            tags: session.tags.clone(),
            sla_deadline: self.sla.deadline(priority, now),
            response_time_minutes: None,
        };

        info!(
            ticket_id = %ticket.id,
            chat_session_id = %ticket.chat_session_id,
            priority = %ticket.priority,
            tier = %ticket.tier,
            suggestions = ticket.ai_suggestions.len(),
            assigned = ?ticket.assigned_agent,
            "Ticket created from chat"
        );
        self.publish(TicketEvent::TicketCreated {
            ticket_id: ticket.id.clone(),
            chat_session_id: ticket.chat_session_id.clone(),
            priority: ticket.priority,
            tier: ticket.tier,
            suggestions: ticket.ai_suggestions.len(),
            timestamp: now,
        });
        self.publish_assignment(&ticket, now);

        Ok(ticket)
    }

    /// Triggers that currently fire for `ticket`
    pub fn evaluate_escalation(
        &self,
        ticket: &Ticket,
        session: Option<&ChatSession>,
    ) -> Vec<EscalationTrigger> {
        self.escalation.evaluate(ticket, session)
    }

    pub fn should_escalate(&self, ticket: &Ticket, session: Option<&ChatSession>) -> bool {
        self.escalation.should_escalate(ticket, session)
    }

    /// Escalate `ticket` one tier, returning the updated ticket.
    ///
    /// The previous agent's slot is released and the ticket is re-run
    /// through agent selection at the new tier; it may come back unassigned.
    ///
    /// This works on a copy and takes no lock. Tickets watched on a
    /// [`TicketBoard`](crate::sweep::TicketBoard) must be escalated through
    /// [`TicketBoard::escalate`](crate::sweep::TicketBoard::escalate) so they
    /// serialize with the sweep.
    pub fn escalate_ticket(&self, ticket: &Ticket, request: EscalationRequest) -> Ticket {
        self.escalate_ticket_at(ticket, request, Utc::now())
    }

    pub fn escalate_ticket_at(
        &self,
        ticket: &Ticket,
        request: EscalationRequest,
        now: DateTime<Utc>,
    ) -> Ticket {
        let mut updated = ticket.clone();
        let record = self.escalation.apply_at(&mut updated, &request, now);

        if let Some(previous) = updated.assigned_agent.take() {
            match self.directory.release(&previous) {
                Ok(()) => self.publish(TicketEvent::AgentReleased {
                    ticket_id: updated.id.clone(),
                    agent_id: previous,
                    timestamp: now,
                }),
                Err(e) => warn!(
                    ticket_id = %updated.id,
                    agent_id = %previous,
                    "Failed to release agent: {}", e
                ),
            }
        }
        updated.assigned_agent = self.assign_agent(&updated.id, updated.tier, &updated.tags);

        self.publish(TicketEvent::TicketEscalated {
            ticket_id: updated.id.clone(),
            from_tier: record.from_tier,
            to_tier: record.to_tier,
            priority: updated.priority,
            reason: record.reason.clone(),
            escalated_by: record.escalated_by.clone(),
            timestamp: now,
        });
        self.publish_assignment(&updated, now);

        updated
    }

    /// Select on a snapshot, then commit atomically. A lost race drops that
    /// candidate and selects again from what is left.
    fn assign_agent(&self, ticket_id: &str, tier: SupportTier, tags: &[String]) -> Option<String> {
        let mut candidates = match self.directory.snapshot() {
            Ok(agents) => agents,
            Err(e) => {
                warn!(ticket_id, "Agent directory unavailable: {}", e);
                return None;
            }
        };

        loop {
            let agent_id = self.selector.select(tier, tags, &candidates)?.id.clone();
            match self.directory.try_assign(&agent_id) {
                Ok(true) => {
                    debug!(ticket_id, agent_id = %agent_id, %tier, "Agent slot committed");
                    return Some(agent_id);
                }
                Ok(false) | Err(TriageError::AgentNotFound { .. }) => {
                    debug!(ticket_id, agent_id = %agent_id, "Lost assignment race, reselecting");
                    candidates.retain(|a| a.id != agent_id);
                }
                Err(e) => {
                    warn!(ticket_id, agent_id = %agent_id, "Assignment failed: {}", e);
                    return None;
                }
            }
        }
    }

    fn publish_assignment(&self, ticket: &Ticket, now: DateTime<Utc>) {
        let event = match &ticket.assigned_agent {
            Some(agent_id) => TicketEvent::TicketAssigned {
                ticket_id: ticket.id.clone(),
                agent_id: agent_id.clone(),
                tier: ticket.tier,
                timestamp: now,
            },
            None => {
                info!(ticket_id = %ticket.id, tier = %ticket.tier, "No agent capacity, ticket left unassigned");
                TicketEvent::TicketUnassigned {
                    ticket_id: ticket.id.clone(),
                    tier: ticket.tier,
                    timestamp: now,
                }
            }
        };
        self.publish(event);
    }

    fn publish(&self, event: TicketEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}
