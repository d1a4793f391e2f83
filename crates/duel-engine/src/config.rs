//! Run configuration.
//!
//! [`RunConfig`] holds every numeric limit the scenario reader enforces. The
//! defaults describe the standard match format; a JSON file may override any
//! subset of fields.
//!
//! ```
//! use duel_engine::config::RunConfig;
//!
//! let config = RunConfig::from_json_str(r#"{ "max_commands": 5 }"#).unwrap();
//! assert_eq!(config.max_commands, 5);
//! assert_eq!(config.max_teams, 10);
//! ```

use duel_core::clamp::POWER_CAP;
use serde::{Deserialize, Serialize};

use crate::RunError;

// ---------------------------------------------------------------------------
// RunConfig
// ---------------------------------------------------------------------------

/// Limits applied while reading and running a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Upper bound on the number of teams (lower bound is always 1).
    pub max_teams: usize,
    /// Upper bound on the number of players (lower bound is the team count).
    pub max_players: usize,
    /// Highest starting power a player may be given. At most the power cap.
    pub max_power: u32,
    /// Highest number of command lines accepted.
    pub max_commands: usize,
    /// Shortest accepted wizard or player name.
    pub min_name_len: usize,
    /// Longest accepted wizard or player name.
    pub max_name_len: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_teams: 10,
            max_players: 100,
            max_power: 1000,
            max_commands: 1000,
            min_name_len: 2,
            max_name_len: 20,
        }
    }
}

impl RunConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, RunError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the limits are usable.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.max_teams == 0 {
            return Err(RunError::InvalidConfig(
                "max_teams must be at least 1".to_owned(),
            ));
        }
        if self.max_players < self.max_teams {
            return Err(RunError::InvalidConfig(format!(
                "max_players ({}) must be at least max_teams ({})",
                self.max_players, self.max_teams
            )));
        }
        if self.max_power > POWER_CAP {
            return Err(RunError::InvalidConfig(format!(
                "max_power ({}) must not exceed the power cap ({POWER_CAP})",
                self.max_power
            )));
        }
        if self.min_name_len == 0 || self.min_name_len > self.max_name_len {
            return Err(RunError::InvalidConfig(format!(
                "name length bounds {}..={} are empty",
                self.min_name_len, self.max_name_len
            )));
        }
        Ok(())
    }
}
