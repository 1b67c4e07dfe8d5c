//! JSON snapshot loading for sessions, agents and knowledge-base entries.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;
use triage::knowledge::sample_entries;
use triage::{ChatSession, KnowledgeBaseEntry, TicketAgent};

use crate::config::DaemonConfig;

/// Everything the engine reads at startup
#[derive(Debug, Clone)]
pub struct Snapshots {
    pub sessions: Vec<ChatSession>,
    pub agents: Vec<TicketAgent>,
    pub knowledge: Vec<KnowledgeBaseEntry>,
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_snapshots(config: &DaemonConfig) -> Result<Snapshots> {
    let sessions: Vec<ChatSession> = load_json(&config.sessions_path)?;
    let agents: Vec<TicketAgent> = load_json(&config.agents_path)?;
    let knowledge = match &config.knowledge_path {
        Some(path) => load_json(path)?,
        None => {
            info!("No knowledge base supplied, using built-in samples");
            sample_entries()
        }
    };

    info!(
        sessions = sessions.len(),
        agents = agents.len(),
        knowledge = knowledge.len(),
        "Snapshots loaded"
    );
    Ok(Snapshots {
        sessions,
        agents,
        knowledge,
    })
}
