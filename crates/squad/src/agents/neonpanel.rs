use anyhow::Result;
use async_trait::async_trait;
use indoc::indoc;
use serde_json::Value;
use std::sync::Arc;

use super::{Agent, FragmentStream};
use crate::models::agent::{AgentConfig, AgentDescriptor};
use crate::models::context::RoutingContext;
use crate::panel::{PanelClient, Record};

const STATS_KEYWORDS: [&str; 4] = ["server", "stats", "status", "performance"];
const USER_KEYWORDS: [&str; 3] = ["user", "account", "profile"];
const SEARCH_KEYWORDS: [&str; 4] = ["search", "find", "list", "show"];
const STOP_WORDS: [&str; 10] = [
    "what", "is", "are", "the", "show", "me", "list", "find", "search", "for",
];
const MAX_SEARCH_TERMS: usize = 3;

const DATA_INSTRUCTIONS: &str = indoc! {"
    Please answer the user's question using the available NeonPanel data above.
    If no relevant data is available, provide a helpful response based on your
    knowledge of NeonPanel operations.
"};

/// Panel data fetched for a single request
#[derive(Debug, Default)]
struct PanelData {
    server_stats: Option<Record>,
    user_data: Option<Record>,
    search_results: Option<Vec<Record>>,
    errors: Vec<String>,
}

impl PanelData {
    fn is_empty(&self) -> bool {
        self.server_stats.is_none()
            && self.user_data.is_none()
            && self.search_results.is_none()
            && self.errors.is_empty()
    }
}

/// Answers panel questions by fetching NeonPanel data and handing it, together
/// with the question, to an inner agent.
///
/// Panel failures never fail the reply; they are mentioned in the prompt so
/// the inner agent can say that some data was unavailable.
pub struct NeonPanelAgent {
    descriptor: AgentDescriptor,
    inner: Arc<dyn Agent>,
    panel: Arc<PanelClient>,
}

impl NeonPanelAgent {
    pub fn new(descriptor: AgentDescriptor, inner: Arc<dyn Agent>, panel: Arc<PanelClient>) -> Self {
        Self {
            descriptor,
            inner,
            panel,
        }
    }

    async fn gather(&self, text: &str, context: &RoutingContext) -> PanelData {
        let lowered = text.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));
        let mut data = PanelData::default();

        if mentions(&STATS_KEYWORDS) {
            match self.panel.get_server_stats().await {
                Ok(stats) => data.server_stats = Some(stats),
                Err(e) => data.errors.push(format!("server stats: {e}")),
            }
        }

        if mentions(&USER_KEYWORDS) && !context.user_id.is_empty() {
            match self.panel.get_user_data(&context.user_id).await {
                Ok(user) => data.user_data = Some(user),
                Err(e) => data.errors.push(format!("user data: {e}")),
            }
        }

        if mentions(&SEARCH_KEYWORDS) {
            let terms = extract_search_terms(text);
            if !terms.is_empty() {
                match self.panel.search_resources(&terms).await {
                    Ok(results) => data.search_results = Some(results),
                    Err(e) => data.errors.push(format!("search: {e}")),
                }
            }
        }

        for error in &data.errors {
            tracing::warn!(agent = %self.descriptor.id, %error, "NeonPanel data unavailable");
        }
        data
    }
}

/// Meaningful words of a request: stop words and words of two characters or
/// less are dropped, and only the first few are kept.
pub fn extract_search_terms(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
        .take(MAX_SEARCH_TERMS)
        .collect::<Vec<_>>()
        .join(" ")
}

fn enhance_prompt(text: &str, data: &PanelData) -> String {
    let mut prompt = format!("User Question: {text}\n\n");
    if data.is_empty() {
        return prompt;
    }

    prompt.push_str("Available NeonPanel Data:\n");
    if let Some(stats) = &data.server_stats {
        prompt.push_str(&format!("Server Statistics: {}\n", Value::Object(stats.clone())));
    }
    if let Some(user) = &data.user_data {
        prompt.push_str(&format!("User Data: {}\n", Value::Object(user.clone())));
    }
    if let Some(results) = &data.search_results {
        let results: Vec<Value> = results.iter().cloned().map(Value::Object).collect();
        prompt.push_str(&format!("Search Results: {}\n", Value::Array(results)));
    }
    if !data.errors.is_empty() {
        prompt.push_str(&format!(
            "Note: There was an issue accessing some data: {}\n",
            data.errors.join("; ")
        ));
    }
    prompt.push('\n');
    prompt.push_str(DATA_INSTRUCTIONS);
    prompt
}

#[async_trait]
impl Agent for NeonPanelAgent {
    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    fn config(&self) -> &AgentConfig {
        self.inner.config()
    }

    async fn reply(&self, text: &str, context: &RoutingContext) -> Result<FragmentStream> {
        let data = self.gather(text, context).await;
        let prompt = enhance_prompt(text, &data);
        self.inner.reply(&prompt, context).await
    }
}
