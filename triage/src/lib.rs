//! Support Ticket Triage Library
//!
//! Turns finished customer chat sessions into support tickets and keeps
//! them moving:
//! - Priority and tier classification from chat signals and tags
//! - Knowledge-base suggestions by keyword overlap
//! - Agent assignment with atomic capacity commits
//! - SLA deadlines per priority
//! - Deterministic tier escalation, on demand or by periodic sweep
//!
//! # Flow
//!
//! ```text
//! ChatSession ─▶ TicketOrchestrator::create_ticket_from_chat ─▶ Ticket
//!                                                               │
//!                 EscalationSweeper (TicketBoard, interval) ◀───┘
//!                          │ triggers fired
//!                          ▼
//!                TicketOrchestrator::escalate_ticket
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use triage::{ChatSession, InMemoryAgentDirectory, Platform, StaticKnowledgeBase, TicketOrchestrator};
//!
//! let directory = InMemoryAgentDirectory::new(Vec::new()).shared();
//! let orchestrator = TicketOrchestrator::new(directory, Arc::new(StaticKnowledgeBase::samples()));
//! let session = ChatSession::new("chat-1", "cust-1", "Ana", Platform::Web).with_tags(["billing"]);
//! let ticket = orchestrator.create_ticket_from_chat(&session)?;
//! # Ok::<(), triage::TriageError>(())
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod agents;
pub mod classify;
pub mod config;
pub mod error;
pub mod escalation;
pub mod events;
pub mod knowledge;
pub mod sweep;
pub mod ticket;

// Re-export key ticket types
pub use ticket::{
    ChatMessage, ChatSession, MessageSender, Platform, Satisfaction, SharedTicketOrchestrator,
    Ticket, TicketOrchestrator, TicketSource, TicketStatus,
};

// Re-export classification and escalation types
pub use classify::{classify_priority, classify_tier, Priority};
pub use escalation::{
    EscalationConfig, EscalationEngine, EscalationRequest, EscalationTrigger, SlaPolicy,
    SupportTier, TicketEscalation,
};

// Re-export agent and knowledge types
pub use agents::{
    AgentDirectory, AgentSelector, AgentStatus, InMemoryAgentDirectory, SelectionStrategy,
    SharedAgentDirectory, TicketAgent,
};
pub use knowledge::{
    KnowledgeBaseEntry, KnowledgeBaseMatcher, KnowledgeSource, MatcherConfig, StaticKnowledgeBase,
};

pub use config::{EngineConfig, TextLimits};
pub use error::{TriageError, TriageResult};
pub use events::{EventBus, EventFilter, FilteredReceiver, SharedEventBus, TicketEvent};
pub use sweep::{EscalationSweeper, SweepReport, TicketBoard};
