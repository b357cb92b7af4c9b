use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::message::Message;

/// What a caller hands to the orchestrator alongside the request text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub recent_messages: Vec<Message>,
    /// Skip classification and send the request to this agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_agent: Option<String>,
    #[serde(default)]
    pub extra: HashMap<String, Value>,
}

impl RequestContext {
    pub fn with_recent_messages(mut self, messages: Vec<Message>) -> Self {
        self.recent_messages = messages;
        self
    }

    pub fn with_preferred_agent<S: Into<String>>(mut self, agent_id: S) -> Self {
        self.preferred_agent = Some(agent_id.into());
        self
    }

    pub fn with_extra<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Per-request view handed to the classifier and the chosen agent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingContext {
    pub user_id: String,
    pub session_id: String,
    pub recent_messages: Vec<Message>,
    pub extra: HashMap<String, Value>,
}

impl RoutingContext {
    /// Build the routing view of a request.
    ///
    /// Callers often append the user's message to their history before sending
    /// it; a trailing user message identical to `text` is therefore dropped so
    /// the in-flight request never shows up as history. At most `max_messages`
    /// of the newest messages are kept.
    pub fn build(
        text: &str,
        user_id: &str,
        session_id: &str,
        context: RequestContext,
        max_messages: usize,
    ) -> Self {
        let mut recent = context.recent_messages;
        if recent
            .last()
            .map(|last| last.is_user() && last.content == text)
            .unwrap_or(false)
        {
            recent.pop();
        }
        if recent.len() > max_messages {
            recent.drain(..recent.len() - max_messages);
        }

        Self {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            recent_messages: recent,
            extra: context.extra,
        }
    }
}
