//! Daemon runtime: ticket intake, escalation sweep and event logging.
//!
//! ```text
//! sessions.json ─▶ ingest ─▶ TicketBoard ─▶ EscalationSweeper (once | every N s)
//!                    │                            │
//!                    └──────── EventBus ◀─────────┘
//!                                 │
//!                                 ▼
//!                           event logger
//! ```

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use triage::{
    ChatSession, EscalationSweeper, EventBus, InMemoryAgentDirectory, SharedEventBus,
    SharedTicketOrchestrator, StaticKnowledgeBase, SweepReport, Ticket, TicketBoard,
    TicketEvent, TicketOrchestrator,
};

use crate::config::DaemonConfig;
use crate::fixtures::Snapshots;

/// Outcome of turning chat sessions into tickets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub created: usize,
    pub rejected: usize,
}

pub struct Daemon {
    orchestrator: SharedTicketOrchestrator,
    board: Arc<TicketBoard>,
    sweeper: EscalationSweeper,
    events: SharedEventBus,
}

impl Daemon {
    pub fn new(config: &DaemonConfig, snapshots: &Snapshots) -> Self {
        let events = EventBus::new().shared();
        let directory = InMemoryAgentDirectory::new(snapshots.agents.clone()).shared();
        let knowledge = Arc::new(StaticKnowledgeBase::new(snapshots.knowledge.clone()));
        let orchestrator = TicketOrchestrator::with_config(directory, knowledge, &config.engine)
            .with_event_bus(events.clone())
            .shared();
        let board = TicketBoard::new().shared();
        let sweeper = EscalationSweeper::new(orchestrator.clone(), board.clone())
            .with_actor(config.escalated_by.clone());

        Self {
            orchestrator,
            board,
            sweeper,
            events,
        }
    }

    pub fn events(&self) -> &SharedEventBus {
        &self.events
    }

    /// Create a ticket per session and put it under escalation watch.
    /// Malformed sessions are logged and skipped.
    pub async fn ingest(&self, sessions: Vec<ChatSession>) -> IngestReport {
        let mut report = IngestReport::default();
        for session in sessions {
            match self.orchestrator.create_ticket_from_chat(&session) {
                Ok(ticket) => {
                    self.board.insert(ticket, Some(session)).await;
                    report.created += 1;
                }
                Err(e) => {
                    warn!(chat_session_id = %session.id, "Skipping chat session: {}", e);
                    report.rejected += 1;
                }
            }
        }
        info!(
            created = report.created,
            rejected = report.rejected,
            "Chat sessions ingested"
        );
        report
    }

    /// Sweep once, or on the configured interval until `cancel` fires
    pub async fn run(&self, config: &DaemonConfig, cancel: CancellationToken) -> SweepReport {
        if config.once {
            self.sweeper.sweep_once(&cancel).await
        } else {
            info!(
                interval_secs = config.sweep_interval.as_secs(),
                "Escalation sweeper started"
            );
            self.sweeper.run(config.sweep_interval, cancel).await
        }
    }

    pub async fn tickets(&self) -> Vec<Ticket> {
        self.board.snapshot().await
    }
}

/// Log every lifecycle event until `cancel` fires or the bus closes.
/// Events already queued when `cancel` fires are still logged. Resolves to
/// the number of events logged.
pub fn spawn_event_logger(bus: &EventBus, cancel: CancellationToken) -> JoinHandle<usize> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        let mut logged = 0;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    loop {
                        match rx.try_recv() {
                            Ok(event) => {
                                log_event(&event);
                                logged += 1;
                            }
                            Err(TryRecvError::Lagged(missed)) => warn!(missed, "Event logger lagged"),
                            Err(_) => break,
                        }
                    }
                    break;
                }
                received = rx.recv() => match received {
                    Ok(event) => {
                        log_event(&event);
                        logged += 1;
                    }
                    Err(RecvError::Lagged(missed)) => warn!(missed, "Event logger lagged"),
                    Err(RecvError::Closed) => break,
                },
            }
        }
        logged
    })
}

fn log_event(event: &TicketEvent) {
    info!(
        event_type = event.event_type(),
        ticket_id = event.ticket_id(),
        agent_id = event.agent_id().unwrap_or("-"),
        "Ticket event"
    );
}

/// Pretty JSON to `output`, or stdout when none is given
pub fn write_tickets(tickets: &[Ticket], output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(tickets).context("Failed to serialize tickets")?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
