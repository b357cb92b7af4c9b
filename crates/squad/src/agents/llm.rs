use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::{fragment_text, Agent, FragmentStream};
use crate::models::agent::{AgentConfig, AgentDescriptor};
use crate::models::context::RoutingContext;
use crate::models::message::Message;
use crate::providers::base::Provider;

/// An agent backed by an LLM provider.
///
/// The system prompt is built from the descriptor, the conversation is the
/// routing context's recent history followed by the request text.
pub struct LlmAgent {
    descriptor: AgentDescriptor,
    config: AgentConfig,
    provider: Arc<dyn Provider>,
    system_prompt: String,
}

impl LlmAgent {
    pub fn new(descriptor: AgentDescriptor, config: AgentConfig, provider: Arc<dyn Provider>) -> Self {
        let system_prompt = format!(
            "You are {}. {}\nAnswer the user's question directly and concisely.",
            descriptor.display_name,
            descriptor.description.trim()
        );
        Self {
            descriptor,
            config,
            provider,
            system_prompt,
        }
    }

    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn reply(&self, text: &str, context: &RoutingContext) -> Result<FragmentStream> {
        let mut messages = context.recent_messages.clone();
        messages.push(Message::user(text));

        let (answer, usage) = self
            .provider
            .complete(&self.system_prompt, &messages, &self.config)
            .await?;
        tracing::debug!(
            agent = %self.descriptor.id,
            input_tokens = ?usage.input_tokens,
            output_tokens = ?usage.output_tokens,
            "completion received"
        );

        Ok(fragment_text(answer, Duration::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockProvider;
    use anyhow::anyhow;
    use futures::TryStreamExt;

    fn descriptor() -> AgentDescriptor {
        AgentDescriptor::new("general", "General Assistant", "A helpful assistant.")
    }

    #[tokio::test]
    async fn test_reply_sends_history_and_request() -> Result<()> {
        let provider = Arc::new(MockProvider::new(vec![Ok("Sure, here you go.".to_string())]));
        let agent = LlmAgent::new(descriptor(), AgentConfig::default(), provider.clone());

        let context = RoutingContext {
            recent_messages: vec![
                Message::user("hi"),
                Message::assistant("general", "hello"),
            ],
            ..Default::default()
        };
        let stream = agent.reply("write an email", &context).await?;
        let text: String = stream.try_collect::<Vec<_>>().await?.concat();
        assert_eq!(text, "Sure, here you go.");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        let (system, messages) = &calls[0];
        assert!(system.starts_with("You are General Assistant."));
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hello", "write an email"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_provider_failure_is_returned() {
        let provider = Arc::new(MockProvider::new(vec![Err(anyhow!("rate limited"))]));
        let agent = LlmAgent::new(descriptor(), AgentConfig::default(), provider);

        let result = agent.reply("hello", &RoutingContext::default()).await;
        assert!(result.is_err());
    }
}
