use crate::error::ConfigError;
use config::{Config, Environment};
use serde::Deserialize;
use squad::agents::setup::SquadSettings;
use squad::models::agent::AgentConfig;
use squad::orchestrator::OrchestratorConfig;
use squad::panel::PanelConfig;
use squad::providers::configs::AnthropicProviderConfig;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub agents: AgentConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Pause between demo answer fragments
    #[serde(default)]
    pub demo_delay_ms: u64,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .add_source(
                Environment::with_prefix("SQUAD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::Load(err)
        })
    }

    /// Combine with the provider and panel credentials found in the
    /// environment
    pub fn into_squad_settings(self) -> SquadSettings {
        SquadSettings {
            agent: self.agents,
            orchestrator: self.orchestrator,
            anthropic: AnthropicProviderConfig::from_env().ok(),
            panel: PanelConfig::from_env(),
            demo_delay: Duration::from_millis(self.demo_delay_ms),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("SQUAD_") {
                env::remove_var(&key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.agents, AgentConfig::default());
        assert_eq!(settings.orchestrator.max_context_messages, 10);
        assert_eq!(settings.demo_delay_ms, 0);
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        clean_env();
        env::set_var("SQUAD_SERVER__PORT", "8080");
        env::set_var("SQUAD_AGENTS__STREAMING", "false");
        env::set_var("SQUAD_AGENTS__TEMPERATURE", "0.2");
        env::set_var("SQUAD_AGENTS__MAX_TOKENS", "256");
        env::set_var("SQUAD_AGENTS__MODEL", "claude-3-haiku-20240307");
        env::set_var("SQUAD_ORCHESTRATOR__MAX_CONTEXT_MESSAGES", "4");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert!(!settings.agents.streaming);
        assert_eq!(settings.agents.temperature, 0.2);
        assert_eq!(settings.agents.max_tokens, 256);
        assert_eq!(settings.agents.model, "claude-3-haiku-20240307");
        assert_eq!(settings.orchestrator.max_context_messages, 4);

        let squad_settings = settings.into_squad_settings();
        assert!(!squad_settings.agent.streaming);
        assert_eq!(squad_settings.orchestrator.max_context_messages, 4);

        clean_env();
    }

    #[test]
    #[serial]
    fn test_invalid_value_is_reported() {
        clean_env();
        env::set_var("SQUAD_SERVER__PORT", "not-a-port");

        assert!(matches!(Settings::new(), Err(ConfigError::Load(_))));

        clean_env();
    }

    #[test]
    fn test_socket_addr_conversion() {
        let server_settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let addr = server_settings.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }
}
