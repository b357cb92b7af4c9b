use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::{SquadError, SquadResult};
use crate::models::context::RoutingContext;
use crate::registry::AgentRegistry;

/// Picks the agent that should answer a request
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        context: &RoutingContext,
        registry: &AgentRegistry,
    ) -> SquadResult<String>;
}

/// Substring routing over capability tags.
///
/// The input is lower-cased and agents are tried in registration order; the
/// first agent with a tag (or an extra keyword registered here under its id)
/// contained in the input wins, so earlier registrations take precedence when
/// several agents match. With no match the registry's default agent is used.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    keywords: HashMap<String, Vec<String>>,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra keywords for `agent_id` on top of its capability tags
    pub fn with_keywords<I, S>(mut self, agent_id: &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords.entry(agent_id.to_string()).or_default().extend(
            keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty()),
        );
        self
    }

    pub fn classify_text(&self, text: &str, registry: &AgentRegistry) -> SquadResult<String> {
        if registry.is_empty() {
            return Err(SquadError::NoAgentsRegistered);
        }

        let lowered = text.to_lowercase();
        for agent in registry.agents() {
            let descriptor = agent.descriptor();
            let extra = self
                .keywords
                .get(&descriptor.id)
                .map(Vec::as_slice)
                .unwrap_or_default();

            let matched = descriptor
                .capability_tags
                .iter()
                .chain(extra.iter())
                .find(|tag| !tag.is_empty() && lowered.contains(tag.as_str()));

            if let Some(tag) = matched {
                tracing::debug!(agent = %descriptor.id, %tag, "keyword match");
                return Ok(descriptor.id.clone());
            }
        }

        Ok(registry.default_agent()?.id().to_string())
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(
        &self,
        text: &str,
        _context: &RoutingContext,
        registry: &AgentRegistry,
    ) -> SquadResult<String> {
        self.classify_text(text, registry)
    }
}
