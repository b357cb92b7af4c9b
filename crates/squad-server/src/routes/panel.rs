use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use squad::panel::{Record, ServerAction};

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
struct ActionRequest {
    action: ServerAction,
}

async fn server_stats(State(state): State<AppState>) -> Result<Json<Record>, ApiError> {
    Ok(Json(state.panel.get_server_stats().await?))
}

async fn user_data(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    Ok(Json(state.panel.get_user_data(&user_id).await?))
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(state.panel.search_resources(&query.q).await?))
}

async fn server_action(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<Record>, ApiError> {
    tracing::info!(%server_id, action = %request.action, "server action requested");
    Ok(Json(
        state
            .panel
            .execute_server_action(&server_id, request.action)
            .await?,
    ))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/panel/stats", get(server_stats))
        .route("/panel/users/:user_id", get(user_data))
        .route("/panel/search", get(search))
        .route("/panel/servers/:server_id/actions", post(server_action))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tests::demo_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_stats_in_demo_mode() {
        let app = routes(demo_state(true));

        let response = app.oneshot(get_request("/panel/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stats = body_json(response).await;
        assert!(stats["active_servers"].as_u64() <= stats["total_servers"].as_u64());
        assert_eq!(stats["demo_mode"], json!(true));
    }

    #[tokio::test]
    async fn test_user_and_search() {
        let app = routes(demo_state(true));

        let response = app
            .clone()
            .oneshot(get_request("/panel/users/alice"))
            .await
            .unwrap();
        let user = body_json(response).await;
        assert_eq!(user["id"], json!("alice"));

        let response = app
            .oneshot(get_request("/panel/search?q=replica"))
            .await
            .unwrap();
        let results = body_json(response).await;
        assert_eq!(results.as_array().map(Vec::len), Some(1));
        assert_eq!(results[0]["name"], json!("db-replica"));
    }

    #[tokio::test]
    async fn test_server_action() {
        let app = routes(demo_state(true));

        let request = Request::builder()
            .uri("/panel/servers/srv-1/actions")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(json!({"action": "restart"}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let result = body_json(response).await;
        assert_eq!(result["server_id"], json!("srv-1"));
        assert_eq!(result["action"], json!("restart"));

        let request = Request::builder()
            .uri("/panel/servers/srv-1/actions")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(json!({"action": "explode"}).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
