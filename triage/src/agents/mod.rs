//! Human agents: directory, capacity and selection.

pub mod registry;
pub mod selector;

pub use registry::{
    AgentDirectory, AgentStatus, InMemoryAgentDirectory, SharedAgentDirectory, TicketAgent,
};
pub use selector::{specialty_matches, AgentSelector, SelectionStrategy};
