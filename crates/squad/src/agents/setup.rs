use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use super::demo::{DemoAgent, DemoPersona};
use super::llm::LlmAgent;
use super::neonpanel::NeonPanelAgent;
use super::Agent;
use crate::models::agent::{AgentConfig, AgentDescriptor};
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::panel::{PanelClient, PanelConfig};
use crate::providers::anthropic::AnthropicProvider;
use crate::providers::base::Provider;
use crate::providers::configs::AnthropicProviderConfig;
use crate::registry::AgentRegistry;
use crate::router::KeywordClassifier;

pub const NEONPANEL_AGENT_ID: &str = "neonpanel";
pub const TECH_AGENT_ID: &str = "tech";
pub const GENERAL_AGENT_ID: &str = "general";

/// Everything needed to assemble the default squad
#[derive(Debug, Clone, Default)]
pub struct SquadSettings {
    pub agent: AgentConfig,
    pub orchestrator: OrchestratorConfig,
    /// LLM backend; demo agents answer when absent
    pub anthropic: Option<AnthropicProviderConfig>,
    pub panel: PanelConfig,
    /// Pause between demo fragments
    pub demo_delay: Duration,
}

impl SquadSettings {
    /// Provider and panel settings from the environment, defaults elsewhere
    pub fn from_env() -> Self {
        Self {
            anthropic: AnthropicProviderConfig::from_env().ok(),
            panel: PanelConfig::from_env(),
            ..Default::default()
        }
    }
}

/// The assembled squad. The panel client is shared with the NeonPanel agent
/// so callers can query the panel directly without a second client.
pub struct Squad {
    pub orchestrator: Orchestrator,
    pub panel: Arc<PanelClient>,
}

fn neonpanel_descriptor() -> AgentDescriptor {
    AgentDescriptor::new(
        NEONPANEL_AGENT_ID,
        "NeonPanel Agent",
        "Specializes in NeonPanel server management, user data retrieval, server \
         statistics and resource operations.",
    )
    .with_tags([
        "neonpanel",
        "neon panel",
        "server stats",
        "server status",
        "performance",
        "account",
        "profile",
        "resources",
    ])
}

fn tech_descriptor() -> AgentDescriptor {
    AgentDescriptor::new(
        TECH_AGENT_ID,
        "Tech Support",
        "Specializes in technical troubleshooting, programming and system \
         administration.",
    )
    .with_tags([
        "code",
        "debug",
        "error",
        "bug",
        "docker",
        "python",
        "programming",
        "network",
        "technical",
        "install",
    ])
}

fn general_descriptor() -> AgentDescriptor {
    AgentDescriptor::new(
        GENERAL_AGENT_ID,
        "General Assistant",
        "A helpful assistant for general questions and conversation.",
    )
}

/// Register the NeonPanel, tech support and general agents, with the general
/// agent as the default.
///
/// Agents are backed by Anthropic when `settings.anthropic` is present and by
/// canned demo answers otherwise.
pub fn build_default_squad(settings: SquadSettings) -> Result<Squad> {
    let panel = Arc::new(PanelClient::new(settings.panel)?);

    let provider: Option<Arc<dyn Provider>> = match settings.anthropic {
        Some(config) => Some(Arc::new(AnthropicProvider::new(config)?)),
        None => {
            tracing::info!("ANTHROPIC_API_KEY not set, agents will give demo answers");
            None
        }
    };

    let backend = |descriptor: AgentDescriptor, persona: DemoPersona| -> Arc<dyn Agent> {
        match &provider {
            Some(provider) => Arc::new(LlmAgent::new(
                descriptor,
                settings.agent.clone(),
                provider.clone(),
            )),
            None => Arc::new(
                DemoAgent::new(descriptor, settings.agent.clone(), persona)
                    .with_delay(settings.demo_delay),
            ),
        }
    };

    let mut registry = AgentRegistry::new();
    registry.register(Arc::new(NeonPanelAgent::new(
        neonpanel_descriptor(),
        backend(neonpanel_descriptor(), DemoPersona::NeonPanel),
        panel.clone(),
    )))?;
    registry.register(backend(tech_descriptor(), DemoPersona::TechSupport))?;
    registry.register(backend(general_descriptor(), DemoPersona::Assistant))?;
    registry.set_default(GENERAL_AGENT_ID)?;

    let classifier = KeywordClassifier::new()
        .with_keywords(NEONPANEL_AGENT_ID, ["neon", "servers", "user data"])
        .with_keywords(TECH_AGENT_ID, ["exception", "stack trace", "compile", "deploy"]);

    let orchestrator = Orchestrator::new(registry)
        .with_classifier(Box::new(classifier))
        .with_config(settings.orchestrator);

    Ok(Squad {
        orchestrator,
        panel,
    })
}
