//! Engine configuration
//!
//! Built-in defaults, optionally overlaid by a TOML file, then by
//! `TRIAGE_*` environment variables.
//!
//! ```toml
//! selection = "least_loaded_specialty_match"
//!
//! [sla]
//! critical_hours = 1
//!
//! [escalation]
//! confidence_threshold = 0.5
//!
//! [matcher]
//! max_suggestions = 5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agents::SelectionStrategy;
use crate::error::{TriageError, TriageResult};
use crate::escalation::{EscalationConfig, SlaPolicy};
use crate::knowledge::MatcherConfig;

/// Character limits for generated ticket text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLimits {
    pub title_max_chars: usize,
    pub description_max_chars: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            title_max_chars: 80,
            description_max_chars: 200,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sla: SlaPolicy,
    pub escalation: EscalationConfig,
    pub matcher: MatcherConfig,
    pub selection: SelectionStrategy,
    pub text: TextLimits,
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> TriageResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> TriageResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TriageError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Defaults overlaid with `TRIAGE_*` environment variables
    pub fn from_env() -> TriageResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay `TRIAGE_*` environment variables onto this config
    pub fn apply_env(&mut self) -> TriageResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> TriageResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_parsed(&lookup, "TRIAGE_SLA_CRITICAL_HOURS", &mut self.sla.critical_hours)?;
        override_parsed(&lookup, "TRIAGE_SLA_HIGH_HOURS", &mut self.sla.high_hours)?;
        override_parsed(&lookup, "TRIAGE_SLA_MEDIUM_HOURS", &mut self.sla.medium_hours)?;
        override_parsed(&lookup, "TRIAGE_SLA_LOW_HOURS", &mut self.sla.low_hours)?;
        override_parsed(
            &lookup,
            "TRIAGE_TIER1_MAX_AGE_MINUTES",
            &mut self.escalation.tier1_max_age_minutes,
        )?;
        override_parsed(
            &lookup,
            "TRIAGE_TIER2_MAX_AGE_MINUTES",
            &mut self.escalation.tier2_max_age_minutes,
        )?;
        override_parsed(
            &lookup,
            "TRIAGE_TIER3_MAX_AGE_MINUTES",
            &mut self.escalation.tier3_max_age_minutes,
        )?;
        override_parsed(
            &lookup,
            "TRIAGE_CONFIDENCE_THRESHOLD",
            &mut self.escalation.confidence_threshold,
        )?;
        override_parsed(&lookup, "TRIAGE_MATCH_MIN_SCORE", &mut self.matcher.min_score)?;
        override_parsed(
            &lookup,
            "TRIAGE_MATCH_MAX_SUGGESTIONS",
            &mut self.matcher.max_suggestions,
        )?;
        override_parsed(&lookup, "TRIAGE_SELECTION_STRATEGY", &mut self.selection)?;
        if let Some(raw) = lookup("TRIAGE_SENSITIVE_TAGS") {
            self.escalation.sensitive_tags = raw
                .split(',')
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
        }
        self.validate()
    }

    pub fn validate(&self) -> TriageResult<()> {
        self.sla.validate().map_err(config_error)?;
        self.escalation.validate().map_err(config_error)?;
        if !(0.0..1.0).contains(&self.matcher.min_score) {
            return Err(config_error(format!(
                "matcher.min_score {} outside [0, 1)",
                self.matcher.min_score
            )));
        }
        if self.text.title_max_chars == 0 || self.text.description_max_chars == 0 {
            return Err(config_error("text limits must be positive".to_string()));
        }
        Ok(())
    }
}

fn config_error(message: String) -> TriageError {
    TriageError::Config { message }
}

fn override_parsed<T, F>(lookup: &F, key: &str, slot: &mut T) -> TriageResult<()>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|e| config_error(format!("{}={:?}: {}", key, raw, e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sla.critical_hours, 2);
        assert_eq!(config.escalation.tier1_max_age_minutes, 120);
        assert_eq!(config.matcher.max_suggestions, 3);
        assert_eq!(config.selection, SelectionStrategy::FirstSpecialtyMatch);
        assert_eq!(config.text.title_max_chars, 80);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            selection = "least_loaded_specialty_match"

            [sla]
            critical_hours = 1

            [escalation]
            sensitive_tags = ["security"]
            "#,
        )
        .unwrap();
        assert_eq!(config.sla.critical_hours, 1);
        assert_eq!(config.sla.low_hours, 48);
        assert_eq!(config.escalation.sensitive_tags, vec!["security"]);
        assert_eq!(config.escalation.confidence_threshold, 0.6);
        assert_eq!(config.selection, SelectionStrategy::LeastLoadedSpecialtyMatch);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let err = EngineConfig::from_toml_str("[sla]\nhigh_hours = 1\n").unwrap_err();
        assert!(matches!(err, TriageError::Config { .. }));
        let err = EngineConfig::from_toml_str("[sla\n").unwrap_err();
        assert!(matches!(err, TriageError::Toml(_)));
    }

    #[test]
    fn test_out_of_range_durations_rejected() {
        let err = EngineConfig::from_toml_str("[sla]\nlow_hours = 9000000000000\n").unwrap_err();
        assert!(matches!(err, TriageError::Config { .. }));
        assert!(err.to_string().contains("low_hours"));
        let err = EngineConfig::from_toml_str("[escalation]\ntier3_max_age_minutes = 9000000000000000\n")
            .unwrap_err();
        assert!(err.to_string().contains("tier3_max_age_minutes"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TRIAGE_SLA_LOW_HOURS", "72"),
            ("TRIAGE_CONFIDENCE_THRESHOLD", "0.4"),
            ("TRIAGE_SELECTION_STRATEGY", "least_loaded"),
            ("TRIAGE_SENSITIVE_TAGS", "Security, vip ,"),
        ]
        .into_iter()
        .collect();
        let mut config = EngineConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.sla.low_hours, 72);
        assert_eq!(config.escalation.confidence_threshold, 0.4);
        assert_eq!(config.selection, SelectionStrategy::LeastLoadedSpecialtyMatch);
        assert_eq!(config.escalation.sensitive_tags, vec!["security", "vip"]);
    }

    #[test]
    fn test_bad_override_names_key() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_overrides(|k| (k == "TRIAGE_SLA_HIGH_HOURS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("TRIAGE_SLA_HIGH_HOURS"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triage.toml");
        std::fs::write(&path, "[matcher]\nmax_suggestions = 5\n").unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.matcher.max_suggestions, 5);

        let missing = EngineConfig::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, TriageError::ConfigRead { .. }));
    }
}
