//! Runtime configuration.
//!
//! Everything the orchestrator needs besides the board itself. Loadable from
//! RON; missing fields fall back to [`RuntimeConfig::default`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use tactics_core::GameConfig;

use crate::api::Result;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Rules tuning handed to the engine.
    pub game: GameConfig,
    /// Seed for the engine's random source.
    pub seed: u64,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Pause applied by [`ThinkingDelay`](crate::ThinkingDelay) before each
    /// AI decision.
    pub thinking_delay_ms: u64,
    /// Commands a provider may issue in one turn before the turn is closed.
    pub max_commands_per_turn: usize,
}

impl RuntimeConfig {
    /// Parses a RON document such as
    ///
    /// ```ron
    /// (
    ///     seed: 7,
    ///     game: (class_bonus_percent: 50),
    ///     thinking_delay_ms: 250,
    /// )
    /// ```
    pub fn from_ron_str(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            seed: 0,
            command_buffer_size: 32,
            event_buffer_size: 100,
            thinking_delay_ms: 0,
            max_commands_per_turn: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RuntimeError;

    #[test]
    fn partial_documents_keep_defaults() {
        let config = RuntimeConfig::from_ron_str(
            "(seed: 7, game: (class_bonus_percent: 50), thinking_delay_ms: 250)",
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.game.class_bonus_percent, 50);
        assert!(config.game.fog_of_war);
        assert_eq!(config.command_buffer_size, 32);
        assert_eq!(config.thinking_delay(), Duration::from_millis(250));
    }

    #[test]
    fn malformed_documents_are_config_errors() {
        let err = RuntimeConfig::from_ron_str("(seed: \"seven\")").unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
    }
}
