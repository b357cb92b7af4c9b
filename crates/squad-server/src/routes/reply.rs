use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{self, header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use futures::{stream::StreamExt, Stream};
use serde::{Deserialize, Serialize};
use squad::models::context::RequestContext;
use squad::models::message::Message;
use squad::models::response::{ResponseContent, ResponseMode};
use std::{
    convert::Infallible,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

pub const AGENT_ID_HEADER: &str = "x-agent-id";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
    /// Earlier turns of the conversation, oldest first
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub agent: Option<String>,
}

impl ChatRequest {
    fn context(&mut self) -> RequestContext {
        let mut context = RequestContext::default().with_recent_messages(std::mem::take(&mut self.messages));
        if let Some(agent) = self.agent.take() {
            context = context.with_preferred_agent(agent);
        }
        context
    }
}

fn default_user_id() -> String {
    "anonymous".to_string()
}

fn default_session_id() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub agent_id: String,
    pub content: String,
    pub latency_ms: u64,
}

/// Plain-text body fed by the task forwarding answer fragments
pub struct TextResponse {
    agent_id: String,
    mode: ResponseMode,
    rx: ReceiverStream<String>,
}

impl Stream for TextResponse {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx)
            .poll_next(cx)
            .map(|opt| opt.map(|s| Ok(Bytes::from(s))))
    }
}

impl IntoResponse for TextResponse {
    fn into_response(self) -> axum::response::Response {
        let agent_id = self.agent_id.clone();
        let mode = match self.mode {
            ResponseMode::Complete => "complete",
            ResponseMode::Streaming => "streaming",
        };
        let body = axum::body::Body::from_stream(self);

        http::Response::builder()
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .header(header::CACHE_CONTROL, "no-cache")
            .header(AGENT_ID_HEADER, agent_id)
            .header("x-response-mode", mode)
            .body(body)
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build reply response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })
    }
}

async fn handler(
    State(state): State<AppState>,
    Json(mut request): Json<ChatRequest>,
) -> Result<TextResponse, ApiError> {
    let context = request.context();
    let response = state
        .orchestrator
        .route_request(&request.message, &request.user_id, &request.session_id, context)
        .await?;

    let (tx, rx) = mpsc::channel(100);
    let agent_id = response.agent_id.clone();
    let mode = response.mode();

    tokio::spawn(async move {
        match response.content {
            ResponseContent::Complete(text) => {
                let _ = tx.send(text).await;
            }
            ResponseContent::Streaming(mut fragments) => {
                while let Some(fragment) = fragments.next().await {
                    if let Err(e) = tx.send(fragment).await {
                        tracing::debug!("Client went away, dropping reply: {}", e);
                        break;
                    }
                }
            }
        }
    });

    Ok(TextResponse {
        agent_id,
        mode,
        rx: ReceiverStream::new(rx),
    })
}

// simple ask for a complete answer, non streaming
async fn ask_handler(
    State(state): State<AppState>,
    Json(mut request): Json<ChatRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let started = Instant::now();
    let context = request.context();
    let response = state
        .orchestrator
        .route_request(&request.message, &request.user_id, &request.session_id, context)
        .await?;

    let agent_id = response.agent_id.clone();
    let content = response.into_text().await;

    Ok(Json(AskResponse {
        agent_id,
        content,
        latency_ms: started.elapsed().as_millis() as u64,
    }))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/reply", post(handler))
        .route("/ask", post(ask_handler))
        .with_state(state)
}
