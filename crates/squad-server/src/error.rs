use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use squad::errors::SquadError;
use squad::panel::RemoteTransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Failure of a request handler, rendered as a JSON `{error}` body
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Squad(#[from] SquadError),
    #[error(transparent)]
    Panel(#[from] RemoteTransportError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Squad(SquadError::EmptyRequest) => StatusCode::BAD_REQUEST,
            ApiError::Squad(SquadError::UnknownAgent(_)) => StatusCode::NOT_FOUND,
            ApiError::Squad(SquadError::NoAgentsRegistered) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Squad(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Panel(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
