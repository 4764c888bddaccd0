//! Text generation configuration

use serde::Deserialize;
use std::time::Duration;

use crate::adapters::ai::AnthropicConfig;

use super::error::ValidationError;

/// Text generator configuration for the analysis pipeline
///
/// Without an API key the pipeline runs on placeholders only.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Token limit per phase request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key
            .as_ref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Adapter configuration, when a key is present
    pub fn anthropic(&self) -> Option<AnthropicConfig> {
        let key = self.anthropic_api_key.as_ref().filter(|_| self.has_anthropic())?;
        Some(
            AnthropicConfig::new(key.trim())
                .with_model(&self.model)
                .with_base_url(&self.base_url)
                .with_timeout(self.timeout())
                .with_default_max_tokens(self.max_tokens),
        )
    }

    /// Validate text generation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.anthropic_api_key.is_some() && !self.has_anthropic() {
            return Err(ValidationError::BlankApiKey);
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_tokens, 1024);
        assert!(!config.has_anthropic());
        assert!(config.anthropic().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 30,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_anthropic_config_carries_settings() {
        let config = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            model: "claude-3-haiku-20240307".to_string(),
            timeout_secs: 15,
            ..Default::default()
        };

        let anthropic = config.anthropic().unwrap();
        assert_eq!(anthropic.model, "claude-3-haiku-20240307");
        assert_eq!(anthropic.timeout, Duration::from_secs(15));
        assert_eq!(anthropic.default_max_tokens, 1024);
    }

    #[test]
    fn test_validation_blank_key() {
        let config = AiConfig {
            anthropic_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::BlankApiKey));
        assert!(config.anthropic().is_none());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = AiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }

    #[test]
    fn test_validation_base_url_scheme() {
        let config = AiConfig {
            base_url: "api.anthropic.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl(_))
        ));
    }
}
