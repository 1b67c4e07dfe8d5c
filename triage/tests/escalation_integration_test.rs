//! Integration tests for ticket creation and escalation
//!
//! Drives the orchestrator end to end: chat session in, ticket out, then
//! the escalation triggers and tier transitions on that ticket.

use std::sync::Arc;

use chrono::{Duration, Utc};
use triage::knowledge::sample_entries;
use triage::{
    ChatMessage, ChatSession, EscalationRequest, EscalationTrigger, InMemoryAgentDirectory,
    KnowledgeBaseMatcher, Platform, Priority, Satisfaction, StaticKnowledgeBase, SupportTier,
    Ticket, TicketAgent, TicketOrchestrator,
};

fn orchestrator() -> TicketOrchestrator {
    let directory = InMemoryAgentDirectory::new(vec![
        TicketAgent::new("frontline", "Ana", SupportTier::Tier1, 10).with_specialties(&["billing"]),
        TicketAgent::new("tech", "Bo", SupportTier::Tier2, 10).with_specialties(&["api"]),
        TicketAgent::new("specialist", "Cy", SupportTier::Tier3, 10)
            .with_specialties(&["security"]),
        TicketAgent::new("manager", "Di", SupportTier::Escalated, 10),
    ]);
    TicketOrchestrator::new(directory.shared(), Arc::new(StaticKnowledgeBase::samples()))
}

fn session(tags: &[&str]) -> ChatSession {
    ChatSession::new("chat-1", "cust-1", "Ana Lima", Platform::Web)
        .with_message(ChatMessage::user("I need help with my account"))
        .with_tags(tags.iter().copied())
}

/// Test: security breach chat goes straight to specialists as critical
#[test]
fn test_security_breach_is_critical_tier3() {
    let orch = orchestrator();
    let chat = session(&["security", "breach"]).with_satisfaction(Satisfaction::Neutral);
    let ticket = orch.create_ticket_from_chat(&chat).unwrap();

    assert_eq!(ticket.priority, Priority::Critical);
    assert_eq!(ticket.tier, SupportTier::Tier3);
    assert_eq!(ticket.sla_deadline - ticket.created_at, Duration::hours(2));
    assert_eq!(ticket.assigned_agent.as_deref(), Some("specialist"));
}

/// Test: handoff outranks a medium tag
#[test]
fn test_handoff_wins_over_billing_tag() {
    let orch = orchestrator();
    let chat = session(&["billing"]).with_handoff(true);
    let ticket = orch.create_ticket_from_chat(&chat).unwrap();

    assert_eq!(ticket.priority, Priority::High);
    assert_eq!(ticket.tier, SupportTier::Tier1);
    assert_eq!(ticket.assigned_agent.as_deref(), Some("frontline"));
}

/// Test: a confident tier1 ticket escalates on age alone
#[test]
fn test_age_threshold_alone_triggers() {
    let orch = orchestrator();
    let now = Utc::now();
    let mut ticket = Ticket::new("chat-1", now - Duration::hours(3));
    ticket.ai_confidence = 0.9;

    let triggers = orch.escalation_engine().evaluate_at(&ticket, None, now);
    assert_eq!(triggers.len(), 1);
    assert!(matches!(
        triggers[0],
        EscalationTrigger::AgeExceeded {
            tier: SupportTier::Tier1,
            limit_minutes: 120,
            ..
        }
    ));
    assert!(orch.should_escalate(&ticket, None));
}

/// Test: low confidence escalates a fresh tier1 ticket
#[test]
fn test_low_confidence_triggers_before_age() {
    let orch = orchestrator();
    let now = Utc::now();
    let mut ticket = Ticket::new("chat-1", now - Duration::minutes(10));
    ticket.ai_confidence = 0.3;

    let triggers = orch.escalation_engine().evaluate_at(&ticket, None, now);
    assert_eq!(
        triggers,
        vec![EscalationTrigger::LowConfidence {
            confidence: 0.3,
            threshold: 0.6
        }]
    );
    assert!(orch.should_escalate(&ticket, None));
}

/// Test: tier3/high escalates to the terminal tier as critical
#[test]
fn test_tier3_escalates_to_management() {
    let orch = orchestrator();
    let created = Utc::now() - Duration::hours(1);
    let mut ticket = Ticket::new("chat-1", created);
    ticket.tier = SupportTier::Tier3;
    ticket.priority = Priority::High;

    let now = Utc::now();
    let escalated = orch.escalate_ticket_at(
        &ticket,
        EscalationRequest::new("customer threatened to churn", "specialist")
            .with_notes("enterprise account"),
        now,
    );

    assert_eq!(escalated.tier, SupportTier::Escalated);
    assert_eq!(escalated.priority, Priority::Critical);
    assert_eq!(escalated.sla_deadline, now + Duration::hours(2));
    assert_eq!(escalated.updated_at, now);
    let record = escalated.last_escalation().unwrap();
    assert_eq!(record.from_tier, SupportTier::Tier3);
    assert_eq!(record.to_tier, SupportTier::Escalated);
    assert_eq!(record.escalated_by, "specialist");
    assert_eq!(record.notes.as_deref(), Some("enterprise account"));
    assert_eq!(escalated.assigned_agent.as_deref(), Some("manager"));
}

/// Test: billing query ranks the refund article first
#[test]
fn test_billing_query_matches_refund_article() {
    let matcher = KnowledgeBaseMatcher::new();
    let entries = sample_entries();
    let matches = matcher.find_matches("double charged on my invoice", &["billing"], &entries);

    assert!(!matches.is_empty());
    assert_eq!(matches[0].id, "kb-billing-refund");

    let keywords = KnowledgeBaseMatcher::keywords("double charged on my invoice", &["billing"]);
    let best = matcher.match_score(&keywords, &matches[0]);
    for entry in &entries {
        assert!(matcher.match_score(&keywords, entry) <= best);
    }
}

/// Test: escalating past the terminal tier keeps the tier but still records
#[test]
fn test_terminal_tier_is_quiescent() {
    let orch = orchestrator();
    let mut ticket = Ticket::new("chat-1", Utc::now() - Duration::days(3));
    ticket.tier = SupportTier::Escalated;
    ticket.priority = Priority::Critical;

    assert!(!orch.should_escalate(&ticket, None));

    let again = orch.escalate_ticket(&ticket, EscalationRequest::new("still open", "system"));
    assert_eq!(again.tier, SupportTier::Escalated);
    assert_eq!(again.priority, Priority::Critical);
    assert_eq!(again.escalations.len(), 1);
    assert!(!again.escalations[0].changed_tier());
}

/// Test: negative satisfaction and sensitive tags only count at tier1
#[test]
fn test_session_signals_only_at_tier1() {
    let orch = orchestrator();
    let chat = session(&["enterprise"]).with_satisfaction(Satisfaction::Negative);
    let now = Utc::now();
    let mut ticket = Ticket::new("chat-1", now);
    ticket.ai_confidence = 1.0;
    ticket.tags = chat.tags.clone();

    let triggers = orch.escalation_engine().evaluate_at(&ticket, Some(&chat), now);
    assert_eq!(
        triggers,
        vec![
            EscalationTrigger::SensitiveTag {
                tag: "enterprise".into()
            },
            EscalationTrigger::NegativeSatisfaction,
        ]
    );

    ticket.tier = SupportTier::Tier2;
    assert!(orch
        .escalation_engine()
        .evaluate_at(&ticket, Some(&chat), now)
        .is_empty());
}

/// Test: a malformed session is the only creation failure
#[test]
fn test_missing_customer_rejected() {
    let orch = orchestrator();
    let chat = ChatSession::new("chat-1", "  ", "Ana", Platform::Facebook);
    let err = orch.create_ticket_from_chat(&chat).unwrap_err();
    assert_eq!(err.to_string(), "Invalid chat session: missing customer_id");
}
