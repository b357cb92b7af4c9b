use futures::stream::{BoxStream, StreamExt};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Agent id attached to responses produced by the orchestrator itself
pub const SYSTEM_AGENT_ID: &str = "system";

/// Shown to the user whenever an agent fails to answer
pub const APOLOGY_MESSAGE: &str =
    "I apologize, but I ran into a problem while answering your request. Please try again.";

/// Text fragments of a streamed answer, consumed once in order
pub type TextStream = BoxStream<'static, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Complete,
    Streaming,
}

pub enum ResponseContent {
    Complete(String),
    Streaming(TextStream),
}

impl fmt::Debug for ResponseContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseContent::Complete(text) => f.debug_tuple("Complete").field(text).finish(),
            ResponseContent::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

/// The answer to a single routed request
#[derive(Debug)]
pub struct Response {
    pub content: ResponseContent,
    pub agent_id: String,
    /// Time spent until the content was available to the caller. For
    /// streaming responses this is the time to the start of the stream.
    pub latency: Duration,
}

impl Response {
    pub fn complete<A: Into<String>, S: Into<String>>(
        agent_id: A,
        text: S,
        latency: Duration,
    ) -> Self {
        Self {
            content: ResponseContent::Complete(text.into()),
            agent_id: agent_id.into(),
            latency,
        }
    }

    pub fn streaming<A: Into<String>>(agent_id: A, stream: TextStream, latency: Duration) -> Self {
        Self {
            content: ResponseContent::Streaming(stream),
            agent_id: agent_id.into(),
            latency,
        }
    }

    /// The fallback returned when the selected agent failed
    pub fn apology(latency: Duration) -> Self {
        Self::complete(SYSTEM_AGENT_ID, APOLOGY_MESSAGE, latency)
    }

    pub fn mode(&self) -> ResponseMode {
        match self.content {
            ResponseContent::Complete(_) => ResponseMode::Complete,
            ResponseContent::Streaming(_) => ResponseMode::Streaming,
        }
    }

    pub fn is_system(&self) -> bool {
        self.agent_id == SYSTEM_AGENT_ID
    }

    /// Drain the response into the full answer text
    pub async fn into_text(self) -> String {
        match self.content {
            ResponseContent::Complete(text) => text,
            ResponseContent::Streaming(stream) => stream.collect::<Vec<_>>().await.concat(),
        }
    }
}
