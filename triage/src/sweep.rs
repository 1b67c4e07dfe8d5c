//! Escalation sweep: periodic re-evaluation of open tickets.
//!
//! ```text
//! TicketBoard ──▶ JoinSet::spawn(evaluate ─▶ escalate) × N tickets
//!                   (ticket mutex held across both steps)
//!             ◀── SweepReport
//! ```
//!
//! Each watched ticket sits behind its own async mutex, so two sweeps (or a
//! sweep and a caller going through [`TicketBoard::escalate`]) can never
//! escalate the same ticket twice for the same condition, or release its
//! agent twice.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::escalation::EscalationRequest;
use crate::ticket::{
    ChatSession, SharedTicketOrchestrator, Ticket, TicketOrchestrator, TicketStatus,
};

/// Actor recorded on sweep-driven escalations
pub const SYSTEM_ACTOR: &str = "system";

struct WatchedTicket {
    ticket: Ticket,
    session: Option<ChatSession>,
}

#[derive(Default)]
struct BoardInner {
    order: Vec<String>,
    tickets: HashMap<String, Arc<Mutex<WatchedTicket>>>,
}

/// Tickets under escalation watch, with the chats they came from
#[derive(Default)]
pub struct TicketBoard {
    inner: RwLock<BoardInner>,
}

impl TicketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Watch `ticket`. An id already on the board has its ticket and
    /// session replaced under that entry's lock.
    pub async fn insert(&self, ticket: Ticket, session: Option<ChatSession>) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let existing = match inner.tickets.entry(ticket.id.clone()) {
            Entry::Occupied(occupied) => occupied.get().clone(),
            Entry::Vacant(vacant) => {
                inner.order.push(vacant.key().clone());
                vacant.insert(Arc::new(Mutex::new(WatchedTicket { ticket, session })));
                return;
            }
        };
        drop(guard);
        *existing.lock().await = WatchedTicket { ticket, session };
    }

    pub async fn get(&self, ticket_id: &str) -> Option<Ticket> {
        let entry = self.entry(ticket_id).await?;
        let watched = entry.lock().await;
        Some(watched.ticket.clone())
    }

    /// Change a ticket's workflow status. Returns false for unknown ids.
    pub async fn set_status(&self, ticket_id: &str, status: TicketStatus) -> bool {
        let Some(entry) = self.entry(ticket_id).await else {
            return false;
        };
        let mut watched = entry.lock().await;
        watched.ticket.status = status;
        watched.ticket.updated_at = Utc::now();
        true
    }

    /// Escalate a watched ticket one tier while holding its lock.
    ///
    /// This is the serialized path for escalating tickets on the board: a
    /// concurrent sweep or caller waits and then sees the updated ticket, so
    /// every escalation record is kept and the previous agent is released
    /// exactly once. Returns `None` for unknown ids.
    pub async fn escalate(
        &self,
        orchestrator: &TicketOrchestrator,
        ticket_id: &str,
        request: EscalationRequest,
    ) -> Option<Ticket> {
        self.escalate_at(orchestrator, ticket_id, request, Utc::now())
            .await
    }

    pub async fn escalate_at(
        &self,
        orchestrator: &TicketOrchestrator,
        ticket_id: &str,
        request: EscalationRequest,
        now: DateTime<Utc>,
    ) -> Option<Ticket> {
        let entry = self.entry(ticket_id).await?;
        let mut watched = entry.lock().await;
        watched.ticket = orchestrator.escalate_ticket_at(&watched.ticket, request, now);
        Some(watched.ticket.clone())
    }

    /// Ticket ids in insertion order
    pub async fn ids(&self) -> Vec<String> {
        self.inner.read().await.order.clone()
    }

    /// Copies of every watched ticket, in insertion order
    pub async fn snapshot(&self) -> Vec<Ticket> {
        let mut tickets = Vec::new();
        for entry in self.entries().await {
            tickets.push(entry.lock().await.ticket.clone());
        }
        tickets
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn entry(&self, ticket_id: &str) -> Option<Arc<Mutex<WatchedTicket>>> {
        self.inner.read().await.tickets.get(ticket_id).cloned()
    }

    async fn entries(&self) -> Vec<Arc<Mutex<WatchedTicket>>> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.tickets.get(id).cloned())
            .collect()
    }
}

/// Outcome counts of one or more sweeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Tickets evaluated against the escalation triggers
    pub checked: usize,
    /// Tickets moved one tier up
    pub escalated: usize,
    /// Inactive tickets, or tickets not reached before cancellation
    pub skipped: usize,
}

impl SweepReport {
    fn merge(&mut self, other: SweepReport) {
        self.checked += other.checked;
        self.escalated += other.escalated;
        self.skipped += other.skipped;
    }
}

enum Outcome {
    Checked,
    Escalated,
    Skipped,
}

pub struct EscalationSweeper {
    orchestrator: SharedTicketOrchestrator,
    board: Arc<TicketBoard>,
    escalated_by: String,
}

impl EscalationSweeper {
    pub fn new(orchestrator: SharedTicketOrchestrator, board: Arc<TicketBoard>) -> Self {
        Self {
            orchestrator,
            board,
            escalated_by: SYSTEM_ACTOR.to_string(),
        }
    }

    /// Actor name recorded on escalations this sweeper performs
    pub fn with_actor(mut self, escalated_by: impl Into<String>) -> Self {
        self.escalated_by = escalated_by.into();
        self
    }

    pub fn board(&self) -> &Arc<TicketBoard> {
        &self.board
    }

    pub async fn sweep_once(&self, cancel: &CancellationToken) -> SweepReport {
        self.sweep_once_at(Utc::now(), cancel).await
    }

    /// Evaluate every watched ticket at `now`, escalating those with a
    /// firing trigger. A ticket moves at most one tier per sweep.
    pub async fn sweep_once_at(&self, now: DateTime<Utc>, cancel: &CancellationToken) -> SweepReport {
        let mut join_set: JoinSet<Outcome> = JoinSet::new();

        for entry in self.board.entries().await {
            let orchestrator = self.orchestrator.clone();
            let escalated_by = self.escalated_by.clone();
            let cancel = cancel.clone();

            join_set.spawn(async move {
                if cancel.is_cancelled() {
                    return Outcome::Skipped;
                }
                let mut watched = entry.lock().await;
                if !watched.ticket.status.is_active() {
                    return Outcome::Skipped;
                }

                let triggers = orchestrator.escalation_engine().evaluate_at(
                    &watched.ticket,
                    watched.session.as_ref(),
                    now,
                );
                if triggers.is_empty() {
                    return Outcome::Checked;
                }

                let reason = triggers
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                debug!(ticket_id = %watched.ticket.id, %reason, "Escalation triggered");
                let request = EscalationRequest::new(reason, escalated_by);
                watched.ticket = orchestrator.escalate_ticket_at(&watched.ticket, request, now);
                Outcome::Escalated
            });
        }

        let mut report = SweepReport::default();
        while let Some(res) = join_set.join_next().await {
            match res {
                Ok(Outcome::Checked) => report.checked += 1,
                Ok(Outcome::Escalated) => {
                    report.checked += 1;
                    report.escalated += 1;
                }
                Ok(Outcome::Skipped) => report.skipped += 1,
                Err(e) => warn!(error = %e, "sweep task panicked"),
            }
        }

        info!(
            checked = report.checked,
            escalated = report.escalated,
            skipped = report.skipped,
            "Escalation sweep complete"
        );
        report
    }

    /// Sweep every `interval` until `cancel` fires. Returns the totals.
    pub async fn run(&self, interval: Duration, cancel: CancellationToken) -> SweepReport {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut total = SweepReport::default();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => total.merge(self.sweep_once(&cancel).await),
            }
        }

        info!(
            checked = total.checked,
            escalated = total.escalated,
            "Escalation sweeper stopped"
        );
        total
    }
}
