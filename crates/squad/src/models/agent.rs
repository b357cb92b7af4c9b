use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity and routing tags of a registered agent.
///
/// Capability tags are normalized to lower case on construction so that the
/// keyword router can compare them against lower-cased input directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub capability_tags: BTreeSet<String>,
}

impl AgentDescriptor {
    pub fn new<I, N, D>(id: I, display_name: N, description: D) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: description.into(),
            capability_tags: BTreeSet::new(),
        }
    }

    pub fn with_tags<T, S>(mut self, tags: T) -> Self
    where
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.capability_tags.extend(
            tags.into_iter()
                .map(|tag| tag.as_ref().trim().to_lowercase())
                .filter(|tag| !tag.is_empty()),
        );
        self
    }
}

/// Generation options of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Whether responses are handed to the caller as a fragment stream
    #[serde(default = "default_streaming")]
    pub streaming: bool,
}

impl AgentConfig {
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            streaming: default_streaming(),
        }
    }
}

fn default_model() -> String {
    "claude-3-sonnet-20240229".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_streaming() -> bool {
    true
}
