//! Agent directory: who can take tickets, and how many they hold.
//!
//! Selection runs on a [`TicketAgent`] snapshot; committing an assignment
//! goes through [`AgentDirectory::try_assign`], which re-checks capacity
//! atomically so `current_tickets <= max_tickets` holds under concurrency.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{TriageError, TriageResult};
use crate::escalation::state::SupportTier;

/// Agent availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Online,
    Busy,
    Offline,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Busy => write!(f, "busy"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// A human support agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketAgent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub tier: SupportTier,
    pub status: AgentStatus,
    #[serde(default)]
    pub current_tickets: u32,
    pub max_tickets: u32,
    /// Free-form specialty labels matched against ticket tags
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl TicketAgent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        tier: SupportTier,
        max_tickets: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            tier,
            status: AgentStatus::Online,
            current_tickets: 0,
            max_tickets,
            specialties: Vec::new(),
        }
    }

    pub fn with_specialties(mut self, specialties: &[&str]) -> Self {
        self.specialties = specialties.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_load(mut self, current_tickets: u32) -> Self {
        self.current_tickets = current_tickets;
        self
    }

    pub fn is_available(&self) -> bool {
        self.status != AgentStatus::Offline
    }

    pub fn has_capacity(&self) -> bool {
        self.current_tickets < self.max_tickets
    }

    /// Whether this agent may receive a new ticket at `tier`
    pub fn can_take(&self, tier: SupportTier) -> bool {
        self.tier == tier && self.is_available() && self.has_capacity()
    }
}

/// The agent directory contract the orchestrator depends on
pub trait AgentDirectory: Send + Sync {
    /// Current agents, in a stable order
    fn snapshot(&self) -> TriageResult<Vec<TicketAgent>>;

    /// Atomically take one ticket slot on `agent_id`.
    ///
    /// Returns `Ok(false)` when the agent went offline or filled up since
    /// the snapshot was taken.
    fn try_assign(&self, agent_id: &str) -> TriageResult<bool>;

    /// Give back one ticket slot. Saturates at zero.
    fn release(&self, agent_id: &str) -> TriageResult<()>;

    fn set_status(&self, agent_id: &str, status: AgentStatus) -> TriageResult<()>;
}

/// Shared reference to an agent directory
pub type SharedAgentDirectory = Arc<dyn AgentDirectory>;

struct AgentSlot {
    agent: TicketAgent,
    load: AtomicU32,
}

impl AgentSlot {
    fn new(agent: TicketAgent) -> Self {
        Self {
            load: AtomicU32::new(agent.current_tickets),
            agent,
        }
    }

    fn view(&self) -> TicketAgent {
        TicketAgent {
            current_tickets: self.load.load(Ordering::Acquire),
            ..self.agent.clone()
        }
    }
}

/// Process-local directory. Per-agent load counters are updated with a
/// compare-and-swap loop; status and roster changes take the write lock.
#[derive(Default)]
pub struct InMemoryAgentDirectory {
    slots: RwLock<Vec<AgentSlot>>,
}

impl InMemoryAgentDirectory {
    pub fn new(agents: Vec<TicketAgent>) -> Self {
        let directory = Self::default();
        if let Ok(mut slots) = directory.slots.write() {
            for agent in agents {
                upsert_slot(&mut slots, agent);
            }
        }
        directory
    }

    pub fn shared(self) -> SharedAgentDirectory {
        Arc::new(self)
    }

    /// Add an agent, or replace the profile of the one with the same id in
    /// place. Tickets it already holds stay counted.
    pub fn register(&self, agent: TicketAgent) -> TriageResult<()> {
        let mut slots = self.write_slots()?;
        info!(agent_id = %agent.id, tier = %agent.tier, "Agent registered");
        upsert_slot(&mut slots, agent);
        Ok(())
    }

    pub fn get(&self, agent_id: &str) -> TriageResult<Option<TicketAgent>> {
        let slots = self.read_slots()?;
        Ok(slots
            .iter()
            .find(|s| s.agent.id == agent_id)
            .map(AgentSlot::view))
    }

    pub fn len(&self) -> usize {
        self.slots.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_slots(&self) -> TriageResult<std::sync::RwLockReadGuard<'_, Vec<AgentSlot>>> {
        self.slots.read().map_err(|_| TriageError::LockPoisoned {
            resource: "agent directory",
        })
    }

    fn write_slots(&self) -> TriageResult<std::sync::RwLockWriteGuard<'_, Vec<AgentSlot>>> {
        self.slots.write().map_err(|_| TriageError::LockPoisoned {
            resource: "agent directory",
        })
    }
}

/// A known id keeps its live load counter; only the profile is replaced
fn upsert_slot(slots: &mut Vec<AgentSlot>, agent: TicketAgent) {
    match slots.iter_mut().find(|s| s.agent.id == agent.id) {
        Some(slot) => slot.agent = agent,
        None => slots.push(AgentSlot::new(agent)),
    }
}

impl AgentDirectory for InMemoryAgentDirectory {
    fn snapshot(&self) -> TriageResult<Vec<TicketAgent>> {
        Ok(self.read_slots()?.iter().map(AgentSlot::view).collect())
    }

    fn try_assign(&self, agent_id: &str) -> TriageResult<bool> {
        let slots = self.read_slots()?;
        let slot = slots
            .iter()
            .find(|s| s.agent.id == agent_id)
            .ok_or_else(|| TriageError::AgentNotFound {
                agent_id: agent_id.to_string(),
            })?;

        if !slot.agent.is_available() {
            return Ok(false);
        }

        let max = slot.agent.max_tickets;
        let committed = slot
            .load
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max).then_some(n + 1)
            })
            .is_ok();
        Ok(committed)
    }

    fn release(&self, agent_id: &str) -> TriageResult<()> {
        let slots = self.read_slots()?;
        let slot = slots
            .iter()
            .find(|s| s.agent.id == agent_id)
            .ok_or_else(|| TriageError::AgentNotFound {
                agent_id: agent_id.to_string(),
            })?;
        // Err here only means the counter was already zero
        let _ = slot
            .load
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        Ok(())
    }
    fn set_status(&self, agent_id: &str, status: AgentStatus) -> TriageResult<()> {
        let mut slots = self.write_slots()?;
        let slot = slots
            .iter_mut()
            .find(|s| s.agent.id == agent_id)
            .ok_or_else(|| TriageError::AgentNotFound {
                agent_id: agent_id.to_string(),
            })?;
        slot.agent.status = status;
        debug!(agent_id, %status, "Agent status changed");
        Ok(())
    }
}
