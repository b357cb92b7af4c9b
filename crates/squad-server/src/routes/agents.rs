use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentInfo {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub capability_tags: Vec<String>,
    pub streaming: bool,
    pub default: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub agents: usize,
    pub panel_demo_mode: bool,
}

async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentInfo>> {
    let registry = state.orchestrator.registry();
    let default_id = registry
        .default_agent()
        .map(|agent| agent.id().to_string())
        .ok();

    let agents = registry
        .agents()
        .map(|agent| {
            let descriptor = agent.descriptor();
            AgentInfo {
                id: descriptor.id.clone(),
                display_name: descriptor.display_name.clone(),
                description: descriptor.description.clone(),
                capability_tags: descriptor.capability_tags.iter().cloned().collect(),
                streaming: agent.config().streaming,
                default: default_id.as_deref() == Some(descriptor.id.as_str()),
            }
        })
        .collect();

    Json(agents)
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        agents: state.orchestrator.registry().len(),
        panel_demo_mode: state.panel.is_demo(),
    })
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/agents", get(list_agents))
        .route("/status", get(status))
        .with_state(state)
}
