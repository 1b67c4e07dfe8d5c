//! Escalation Engine: deterministic triggers and tier transitions
//!
//! Evaluates a ticket (and optionally the chat it came from) against the
//! escalation triggers and applies the tier/priority/SLA transition. Agent
//! reassignment is left to the orchestrator.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classify::first_matching_tag;
use crate::escalation::sla::SlaPolicy;
use crate::escalation::state::{
    EscalationRequest, EscalationTrigger, SupportTier, TicketEscalation,
};
use crate::ticket::session::ChatSession;
use crate::ticket::types::Ticket;

/// Longest per-tier age limit a config may set (ten years)
pub const MAX_AGE_MINUTES: i64 = 10 * 365 * 24 * 60;

/// Configuration for the Escalation Engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Age limit at tier1, in minutes
    pub tier1_max_age_minutes: i64,
    /// Age limit at tier2, in minutes
    pub tier2_max_age_minutes: i64,
    /// Age limit at tier3, in minutes
    pub tier3_max_age_minutes: i64,
    /// Tier1 tickets with AI confidence strictly below this escalate
    pub confidence_threshold: f64,
    /// Tags a tier1 ticket must not keep
    pub sensitive_tags: Vec<String>,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            tier1_max_age_minutes: 2 * 60,
            tier2_max_age_minutes: 4 * 60,
            tier3_max_age_minutes: 8 * 60,
            confidence_threshold: 0.6,
            sensitive_tags: ["security", "breach", "enterprise", "critical"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl EscalationConfig {
    /// Age limit for `tier`; `None` for the terminal tier
    pub fn max_age(&self, tier: SupportTier) -> Option<Duration> {
        let minutes = match tier {
            SupportTier::Tier1 => self.tier1_max_age_minutes,
            SupportTier::Tier2 => self.tier2_max_age_minutes,
            SupportTier::Tier3 => self.tier3_max_age_minutes,
            SupportTier::Escalated => return None,
        };
        Some(Duration::try_minutes(minutes).unwrap_or(Duration::MAX))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "escalation.confidence_threshold {} outside [0, 1]",
                self.confidence_threshold
            ));
        }
        for (name, minutes) in [
            ("tier1_max_age_minutes", self.tier1_max_age_minutes),
            ("tier2_max_age_minutes", self.tier2_max_age_minutes),
            ("tier3_max_age_minutes", self.tier3_max_age_minutes),
        ] {
            if minutes <= 0 {
                return Err(format!("escalation.{} must be positive", name));
            }
            if minutes > MAX_AGE_MINUTES {
                return Err(format!(
                    "escalation.{} ({}) exceeds the {} minute limit",
                    name, minutes, MAX_AGE_MINUTES
                ));
            }
        }
        Ok(())
    }
}

/// The Escalation Engine: deterministic state machine
#[derive(Debug, Clone, Default)]
pub struct EscalationEngine {
    config: EscalationConfig,
    sla: SlaPolicy,
}

impl EscalationEngine {
    /// Create a new engine with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: EscalationConfig, sla: SlaPolicy) -> Self {
        Self { config, sla }
    }

    pub fn config(&self) -> &EscalationConfig {
        &self.config
    }

    pub fn sla(&self) -> &SlaPolicy {
        &self.sla
    }

    /// All triggers that fire for `ticket` at `now`.
    ///
    /// Age applies at every tier except the terminal one. Confidence, tag
    /// and satisfaction triggers only apply at tier1.
    pub fn evaluate_at(
        &self,
        ticket: &Ticket,
        session: Option<&ChatSession>,
        now: DateTime<Utc>,
    ) -> Vec<EscalationTrigger> {
        let mut triggers = Vec::new();

        if let Some(limit) = self.config.max_age(ticket.tier) {
            let age = now - ticket.created_at;
            if age > limit {
                triggers.push(EscalationTrigger::AgeExceeded {
                    tier: ticket.tier,
                    age_minutes: age.num_minutes(),
                    limit_minutes: limit.num_minutes(),
                });
            }
        }

        if ticket.tier != SupportTier::Tier1 {
            return triggers;
        }

        if ticket.ai_confidence < self.config.confidence_threshold {
            triggers.push(EscalationTrigger::LowConfidence {
                confidence: ticket.ai_confidence,
                threshold: self.config.confidence_threshold,
            });
        }

        let sensitive: Vec<&str> = self.config.sensitive_tags.iter().map(String::as_str).collect();
        if let Some(tag) = first_matching_tag(&ticket.tags, &sensitive) {
            triggers.push(EscalationTrigger::SensitiveTag {
                tag: tag.trim().to_string(),
            });
        }

        if session.is_some_and(ChatSession::is_negative) {
            triggers.push(EscalationTrigger::NegativeSatisfaction);
        }

        triggers
    }

    pub fn evaluate(&self, ticket: &Ticket, session: Option<&ChatSession>) -> Vec<EscalationTrigger> {
        self.evaluate_at(ticket, session, Utc::now())
    }

    pub fn should_escalate_at(
        &self,
        ticket: &Ticket,
        session: Option<&ChatSession>,
        now: DateTime<Utc>,
    ) -> bool {
        !self.evaluate_at(ticket, session, now).is_empty()
    }

    /// Whether any escalation trigger fires now
    pub fn should_escalate(&self, ticket: &Ticket, session: Option<&ChatSession>) -> bool {
        self.should_escalate_at(ticket, session, Utc::now())
    }

    /// Move `ticket` one tier up the ladder.
    ///
    /// Appends the escalation record, raises priority one step (saturating),
    /// restarts the SLA clock at `now` and bumps `updated_at`. At the
    /// terminal tier the tier stays put but everything else still happens.
    pub fn apply_at(
        &self,
        ticket: &mut Ticket,
        request: &EscalationRequest,
        now: DateTime<Utc>,
    ) -> TicketEscalation {
        let from_tier = ticket.tier;
        let to_tier = from_tier.next();
        let record = TicketEscalation::new(from_tier, to_tier, request, now);

        ticket.escalations.push(record.clone());
        ticket.tier = to_tier;
        ticket.priority = ticket.priority.increase();
        ticket.sla_deadline = self.sla.deadline(ticket.priority, now);
        ticket.updated_at = now;

        info!(
            ticket_id = %ticket.id,
            from = %from_tier,
            to = %to_tier,
            priority = %ticket.priority,
            reason = %request.reason,
            "Ticket escalated"
        );
        record
    }
}
