//! Engine configuration

use serde::Deserialize;

use crate::domain::rcip::DEFAULT_MAX_TURNS;

use super::error::ValidationError;

/// Per-session engine settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Turn limit after which a session reports done
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Seeds every session's variation randomness; unset uses thread randomness
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_turns == 0 {
            return Err(ValidationError::InvalidMaxTurns);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            random_seed: None,
        }
    }
}

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}
