//! # Timeline Configuration
//!
//! Labels and id prefixes used when composite events are synthesized.
//! Defaults match what the match report UI expects; a YAML file can
//! override any subset of keys.
//!
//! ```rust
//! use match_timeline::TimelineConfig;
//!
//! let cfg = TimelineConfig::from_yaml_str("goalie_position: keeper").unwrap();
//! assert_eq!(cfg.goalie_position, "keeper");
//! assert_eq!(cfg.substitution_id_prefix, "sub");
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Position label that marks a goalkeeper (compared case-insensitively)
    pub goalie_position: String,
    /// Prefix for merged substitution ids (`<prefix>-<correlationId>`)
    pub substitution_id_prefix: String,
    /// Prefix for position / goalie group ids
    pub position_id_prefix: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            goalie_position: "goalie".to_string(),
            substitution_id_prefix: "sub".to_string(),
            position_id_prefix: "pos".to_string(),
        }
    }
}

impl TimelineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn is_goalie_position(&self, position: &str) -> bool {
        position.eq_ignore_ascii_case(&self.goalie_position)
    }

    pub(crate) fn substitution_id(&self, correlation_id: &str) -> String {
        format!("{}-{}", self.substitution_id_prefix, correlation_id)
    }

    pub(crate) fn position_id(&self, correlation_id: &str) -> String {
        format!("{}-{}", self.position_id_prefix, correlation_id)
    }
}
