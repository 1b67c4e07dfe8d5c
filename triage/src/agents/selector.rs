//! Agent selection: specialty match first, then least load.

use serde::{Deserialize, Serialize};

use super::registry::TicketAgent;
use crate::escalation::state::SupportTier;

/// Tie-break among agents whose specialties match the ticket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// First specialty match in snapshot order
    #[default]
    FirstSpecialtyMatch,
    /// Specialty match with the fewest open tickets
    LeastLoadedSpecialtyMatch,
}

impl std::str::FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first_specialty_match" | "first" => Ok(Self::FirstSpecialtyMatch),
            "least_loaded_specialty_match" | "least_loaded" => {
                Ok(Self::LeastLoadedSpecialtyMatch)
            }
            other => Err(format!("unknown selection strategy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AgentSelector {
    strategy: SelectionStrategy,
}

impl AgentSelector {
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Pick an agent for `tier` from `agents`.
    ///
    /// Only agents at exactly `tier`, not offline and below capacity are
    /// candidates. `None` is a normal outcome: the ticket stays unassigned.
    pub fn select<'a, S: AsRef<str>>(
        &self,
        tier: SupportTier,
        tags: &[S],
        agents: &'a [TicketAgent],
    ) -> Option<&'a TicketAgent> {
        let candidates: Vec<&TicketAgent> = agents.iter().filter(|a| a.can_take(tier)).collect();
        if candidates.is_empty() {
            return None;
        }

        let mut specialists = candidates
            .iter()
            .copied()
            .filter(|a| specialty_matches(a, tags));
        let specialist = match self.strategy {
            SelectionStrategy::FirstSpecialtyMatch => specialists.next(),
            SelectionStrategy::LeastLoadedSpecialtyMatch => {
                specialists.min_by_key(|a| a.current_tickets)
            }
        };

        specialist.or_else(|| candidates.into_iter().min_by_key(|a| a.current_tickets))
    }
}

/// Whether any tag and specialty contain one another, ignoring case
pub fn specialty_matches<S: AsRef<str>>(agent: &TicketAgent, tags: &[S]) -> bool {
    agent.specialties.iter().any(|specialty| {
        let specialty = specialty.trim().to_lowercase();
        !specialty.is_empty()
            && tags.iter().any(|tag| {
                let tag = tag.as_ref().trim().to_lowercase();
                !tag.is_empty() && (tag.contains(&specialty) || specialty.contains(&tag))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::registry::AgentStatus;

    fn roster() -> Vec<TicketAgent> {
        vec![
            TicketAgent::new("t1-busy", "Ana", SupportTier::Tier1, 5).with_load(4),
            TicketAgent::new("t1-billing", "Bo", SupportTier::Tier1, 5)
                .with_load(3)
                .with_specialties(&["billing", "refunds"]),
            TicketAgent::new("t1-idle", "Cy", SupportTier::Tier1, 5).with_load(1),
            TicketAgent::new("t1-payments", "Di", SupportTier::Tier1, 5)
                .with_load(0)
                .with_specialties(&["payments"]),
            TicketAgent::new("t2", "Ed", SupportTier::Tier2, 5),
        ]
    }

    #[test]
    fn test_specialty_match_preferred_over_load() {
        let agents = roster();
        let picked = AgentSelector::default()
            .select(SupportTier::Tier1, &["billing"], &agents)
            .unwrap();
        assert_eq!(picked.id, "t1-billing");
    }

    #[test]
    fn test_first_match_vs_least_loaded() {
        let agents = roster();
        // "payment" is a substring of "payments"; "billing" tag hits t1-billing
        let tags = ["billing", "payment"];
        let first = AgentSelector::new(SelectionStrategy::FirstSpecialtyMatch)
            .select(SupportTier::Tier1, &tags, &agents)
            .unwrap();
        assert_eq!(first.id, "t1-billing");
        let least = AgentSelector::new(SelectionStrategy::LeastLoadedSpecialtyMatch)
            .select(SupportTier::Tier1, &tags, &agents)
            .unwrap();
        assert_eq!(least.id, "t1-payments");
    }

    #[test]
    fn test_falls_back_to_least_loaded() {
        let agents = roster();
        let picked = AgentSelector::default()
            .select(SupportTier::Tier1, &["shipping"], &agents)
            .unwrap();
        assert_eq!(picked.id, "t1-payments");
    }

    #[test]
    fn test_least_loaded_tie_keeps_order() {
        let agents = vec![
            TicketAgent::new("x", "X", SupportTier::Tier2, 3).with_load(1),
            TicketAgent::new("y", "Y", SupportTier::Tier2, 3).with_load(1),
        ];
        let none: [&str; 0] = [];
        let picked = AgentSelector::default()
            .select(SupportTier::Tier2, &none, &agents)
            .unwrap();
        assert_eq!(picked.id, "x");
    }

    #[test]
    fn test_no_candidate_at_tier() {
        let agents = roster();
        assert!(AgentSelector::default()
            .select(SupportTier::Tier3, &["security"], &agents)
            .is_none());
    }

    #[test]
    fn test_offline_and_full_agents_skipped() {
        let agents = vec![
            TicketAgent::new("off", "Off", SupportTier::Tier1, 5)
                .with_status(AgentStatus::Offline)
                .with_specialties(&["billing"]),
            TicketAgent::new("full", "Full", SupportTier::Tier1, 2)
                .with_load(2)
                .with_specialties(&["billing"]),
            TicketAgent::new("ok", "Ok", SupportTier::Tier1, 2).with_status(AgentStatus::Busy),
        ];
        let picked = AgentSelector::default()
            .select(SupportTier::Tier1, &["billing"], &agents)
            .unwrap();
        assert_eq!(picked.id, "ok");
    }

    #[test]
    fn test_specialty_match_is_bidirectional_substring() {
        let agent = TicketAgent::new("a", "A", SupportTier::Tier2, 1).with_specialties(&["API"]);
        assert!(specialty_matches(&agent, &["api-keys"]));
        let agent = TicketAgent::new("b", "B", SupportTier::Tier2, 1)
            .with_specialties(&["integrations"]);
        assert!(specialty_matches(&agent, &["integration"]));
        assert!(!specialty_matches(&agent, &[""]));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "least_loaded".parse::<SelectionStrategy>().unwrap(),
            SelectionStrategy::LeastLoadedSpecialtyMatch
        );
        assert!("random".parse::<SelectionStrategy>().is_err());
    }
}
