use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::time::Duration;

use crate::models::agent::{AgentConfig, AgentDescriptor};
use crate::models::context::RoutingContext;

pub mod demo;
pub mod llm;
pub mod neonpanel;
pub mod setup;

/// Fragments of an agent's answer. An `Err` item aborts the answer.
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// Number of whitespace-separated words per streamed fragment
pub const WORDS_PER_FRAGMENT: usize = 3;

/// A named handler that can answer user text
#[async_trait]
pub trait Agent: Send + Sync {
    fn descriptor(&self) -> &AgentDescriptor;

    fn config(&self) -> &AgentConfig;

    fn id(&self) -> &str {
        &self.descriptor().id
    }

    /// Start answering `text`. Errors returned here, or yielded by the
    /// stream, are turned into an apology by the orchestrator.
    async fn reply(&self, text: &str, context: &RoutingContext) -> Result<FragmentStream>;
}

/// Split a finished answer into fragments of a few words each.
///
/// Whitespace is kept attached to the preceding word, so concatenating the
/// fragments gives back `text` unchanged.
pub fn fragment_text(text: String, delay: Duration) -> FragmentStream {
    Box::pin(async_stream::stream! {
        let words: Vec<&str> = text
            .split_inclusive(|c: char| c.is_whitespace())
            .collect();
        for chunk in words.chunks(WORDS_PER_FRAGMENT) {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let fragment: Result<String> = Ok(chunk.concat());
            yield fragment;
        }
    })
}
