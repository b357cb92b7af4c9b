mod configuration;
mod error;
mod routes;
mod state;

use squad::agents::setup::build_default_squad;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = configuration::Settings::new()?;
    let addr = settings.server.socket_addr()?;

    let squad = build_default_squad(settings.into_squad_settings())?;
    let state = state::AppState::new(squad);
    info!(
        agents = state.orchestrator.registry().len(),
        panel_demo_mode = state.panel.is_demo(),
        "squad ready"
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
