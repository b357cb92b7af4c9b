use futures::stream::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::agents::{Agent, FragmentStream};
use crate::errors::{SquadError, SquadResult};
use crate::models::context::{RequestContext, RoutingContext};
use crate::models::response::{Response, TextStream, APOLOGY_MESSAGE};
use crate::registry::AgentRegistry;
use crate::router::{Classifier, KeywordClassifier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Newest history messages handed to the agent
    #[serde(default = "default_max_context_messages")]
    pub max_context_messages: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_context_messages: default_max_context_messages(),
        }
    }
}

fn default_max_context_messages() -> usize {
    10
}

/// Entry point for the presentation layer: routes a request to one agent and
/// packages its answer.
///
/// The orchestrator holds no per-request state, so one instance can serve
/// many sessions concurrently.
pub struct Orchestrator {
    registry: Arc<AgentRegistry>,
    classifier: Box<dyn Classifier>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create an orchestrator routing with a [`KeywordClassifier`]
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            classifier: Box::new(KeywordClassifier::new()),
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Route `text` to an agent and return its answer.
    ///
    /// Blank text, an empty registry and an unknown preferred agent are
    /// reported as errors. Failures of the agent itself are not: they turn
    /// into an apology attributed to the `system` agent.
    pub async fn route_request(
        &self,
        text: &str,
        user_id: &str,
        session_id: &str,
        context: RequestContext,
    ) -> SquadResult<Response> {
        if text.trim().is_empty() {
            return Err(SquadError::EmptyRequest);
        }
        let started = Instant::now();

        let preferred = context.preferred_agent.clone();
        let routing = RoutingContext::build(
            text,
            user_id,
            session_id,
            context,
            self.config.max_context_messages,
        );

        let agent_id = match preferred {
            Some(id) => id,
            None => {
                self.classifier
                    .classify(text, &routing, &self.registry)
                    .await?
            }
        };
        let agent = self.registry.get(&agent_id)?;
        tracing::info!(
            agent = %agent_id,
            user_id,
            session_id,
            history = routing.recent_messages.len(),
            "routing request"
        );

        let fragments = match agent.reply(text, &routing).await {
            Ok(fragments) => fragments,
            Err(e) => {
                tracing::error!(agent = %agent_id, error = %e, "agent failed to start reply");
                return Ok(Response::apology(started.elapsed()));
            }
        };

        if agent.config().streaming {
            let latency = started.elapsed();
            tracing::info!(agent = %agent_id, latency_ms = latency.as_millis() as u64, "streaming response");
            return Ok(Response::streaming(
                agent_id.clone(),
                guard_stream(agent_id, fragments),
                latency,
            ));
        }

        match collect_fragments(fragments).await {
            Ok(answer) => {
                let latency = started.elapsed();
                tracing::info!(agent = %agent_id, latency_ms = latency.as_millis() as u64, "response complete");
                Ok(Response::complete(agent_id, answer, latency))
            }
            Err(e) => {
                tracing::error!(agent = %agent_id, error = %e, "agent failed while answering");
                Ok(Response::apology(started.elapsed()))
            }
        }
    }

    /// Shorthand for looking up an agent through the shared registry
    pub fn agent(&self, id: &str) -> SquadResult<Arc<dyn Agent>> {
        self.registry.get(id)
    }
}

async fn collect_fragments(mut fragments: FragmentStream) -> anyhow::Result<String> {
    let mut answer = String::new();
    while let Some(fragment) = fragments.next().await {
        answer.push_str(&fragment?);
    }
    Ok(answer)
}

/// Pass fragments through until the first error, which is replaced by the
/// apology text and ends the stream.
fn guard_stream(agent_id: String, mut fragments: FragmentStream) -> TextStream {
    Box::pin(async_stream::stream! {
        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(text) => yield text,
                Err(e) => {
                    tracing::error!(agent = %agent_id, error = %e, "agent stream failed");
                    yield format!("\n\n{}", APOLOGY_MESSAGE);
                    break;
                }
            }
        }
    })
}
