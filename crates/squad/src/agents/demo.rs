use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use super::{fragment_text, Agent, FragmentStream};
use crate::models::agent::{AgentConfig, AgentDescriptor};
use crate::models::context::RoutingContext;

/// Canned answer styles used when no LLM backend is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoPersona {
    Assistant,
    TechSupport,
    NeonPanel,
}

impl DemoPersona {
    fn preview_len(&self) -> usize {
        match self {
            DemoPersona::Assistant => 30,
            DemoPersona::TechSupport => 50,
            DemoPersona::NeonPanel => 40,
        }
    }

    fn answer(&self, display_name: &str, text: &str) -> String {
        let preview: String = text.chars().take(self.preview_len()).collect();
        let ellipsis = if text.chars().count() > self.preview_len() {
            "..."
        } else {
            ""
        };
        match self {
            DemoPersona::Assistant => format!(
                "**{display_name}**: Thank you for your message about '{preview}{ellipsis}'. \
                 This is a demo response showing the multi-agent system in action. \
                 Configure an API key to get real answers."
            ),
            DemoPersona::TechSupport => format!(
                "**{display_name}**: I understand you're asking about '{preview}{ellipsis}'. \
                 In a full deployment I would walk through diagnostics, likely causes and \
                 concrete fixes for this technical issue."
            ),
            DemoPersona::NeonPanel => format!(
                "**{display_name}**: Regarding '{preview}{ellipsis}', I can help you monitor \
                 servers, look up user accounts and search NeonPanel resources. \
                 This demo shows the NeonPanel integration."
            ),
        }
    }
}

/// An agent that answers with persona-specific canned text
pub struct DemoAgent {
    descriptor: AgentDescriptor,
    config: AgentConfig,
    persona: DemoPersona,
    delay: Duration,
}

impl DemoAgent {
    pub fn new(descriptor: AgentDescriptor, config: AgentConfig, persona: DemoPersona) -> Self {
        Self {
            descriptor,
            config,
            persona,
            delay: Duration::ZERO,
        }
    }

    /// Pause between streamed fragments to imitate typing
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Agent for DemoAgent {
    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn reply(&self, text: &str, _context: &RoutingContext) -> Result<FragmentStream> {
        let answer = self.persona.answer(&self.descriptor.display_name, text);
        Ok(fragment_text(answer, self.delay))
    }
}
