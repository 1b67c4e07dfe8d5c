//! Escalation Engine: Deterministic State Machine for Support Tiers
//!
//! # Escalation Ladder
//!
//! ```text
//! tier1 ── 2h ──┐   also escalates on: ai confidence < 0.6,
//!     │         │   sensitive tag, negative satisfaction
//!     ▼         │
//! tier2 ── 4h ──┤
//!     │         │
//!     ▼         │
//! tier3 ── 8h ──┤
//!     │         │
//!     ▼         ▼
//! escalated (terminal; further escalations keep the tier)
//! ```
//!
//! Every escalation raises priority one step (saturating at critical) and
//! restarts the SLA clock from the escalation time.

pub mod engine;
pub mod sla;
pub mod state;

pub use engine::{EscalationConfig, EscalationEngine, MAX_AGE_MINUTES};
pub use sla::{SlaPolicy, MAX_SLA_HOURS};
pub use state::{EscalationRequest, EscalationTrigger, SupportTier, TicketEscalation};
