//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `RCIP` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use rcip_engine::config::{init_tracing, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! init_tracing(&config.logging).expect("Failed to install subscriber");
//!
//! println!("Sessions end after {} turns", config.engine.max_turns);
//! ```

mod ai;
mod engine;
mod error;
mod logging;

pub use ai::AiConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{init_tracing, LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// placeholder-only setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Session engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Text generator used by the analysis pipeline
    #[serde(default)]
    pub ai: AiConfig,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RCIP` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RCIP__ENGINE__MAX_TURNS=12` -> `engine.max_turns = 12`
    /// - `RCIP__AI__ANTHROPIC_API_KEY=...` -> `ai.anthropic_api_key = ...`
    /// - `RCIP__LOGGING__LEVEL=debug` -> `logging.level = "debug"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("RCIP").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.ai.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "RCIP__ENGINE__MAX_TURNS",
        "RCIP__AI__ANTHROPIC_API_KEY",
        "RCIP__AI__TIMEOUT_SECS",
        "RCIP__LOGGING__LEVEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.unwrap();
        assert_eq!(config.engine.max_turns, 20);
        assert!(!config.ai.has_anthropic());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("RCIP__ENGINE__MAX_TURNS", "8");
        env::set_var("RCIP__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
        env::set_var("RCIP__AI__TIMEOUT_SECS", "15");
        env::set_var("RCIP__LOGGING__LEVEL", "debug");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.engine.max_turns, 8);
        assert!(config.ai.has_anthropic());
        assert_eq!(config.ai.timeout_secs, 15);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_invalid_section() {
        let config = AppConfig {
            engine: EngineConfig {
                max_turns: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMaxTurns));
    }
}
