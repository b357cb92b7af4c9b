use anyhow::{anyhow, Result};
use std::env;

pub const ANTHROPIC_HOST: &str = "https://api.anthropic.com";

#[derive(Debug, Clone)]
pub struct AnthropicProviderConfig {
    pub host: String,
    pub api_key: String,
}

impl AnthropicProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: ANTHROPIC_HOST.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Read `ANTHROPIC_API_KEY` (required) and `ANTHROPIC_HOST` (optional)
    pub fn from_env() -> Result<Self> {
        let api_key = non_empty_env("ANTHROPIC_API_KEY")
            .ok_or_else(|| anyhow!("ANTHROPIC_API_KEY environment variable is required"))?;
        let host = non_empty_env("ANTHROPIC_HOST").unwrap_or_else(|| ANTHROPIC_HOST.to_string());
        Ok(Self { host, api_key })
    }
}

/// An environment variable that is set to something other than blanks
pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_requires_key() {
        env::remove_var("ANTHROPIC_API_KEY");
        assert!(AnthropicProviderConfig::from_env().is_err());

        env::set_var("ANTHROPIC_API_KEY", "   ");
        assert!(AnthropicProviderConfig::from_env().is_err());
        env::remove_var("ANTHROPIC_API_KEY");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_host() -> Result<()> {
        env::set_var("ANTHROPIC_API_KEY", "sk-test");
        env::remove_var("ANTHROPIC_HOST");

        let config = AnthropicProviderConfig::from_env()?;
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.host, ANTHROPIC_HOST);

        env::remove_var("ANTHROPIC_API_KEY");
        Ok(())
    }
}
