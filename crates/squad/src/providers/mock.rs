use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

use crate::models::agent::AgentConfig;
use crate::models::message::Message;
use crate::providers::base::{Provider, Usage};

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Result<String>>>>,
    seen: Arc<Mutex<Vec<(String, Vec<Message>)>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The system prompts and conversations passed to `complete` so far
    pub fn calls(&self) -> Vec<(String, Vec<Message>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        _config: &AgentConfig,
    ) -> Result<(String, Usage)> {
        self.seen
            .lock()
            .unwrap()
            .push((system.to_string(), messages.to_vec()));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(anyhow!("no more mock responses"))
        } else {
            responses.remove(0).map(|text| (text, Usage::default()))
        }
    }
}
