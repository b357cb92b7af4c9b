pub mod agents;
pub mod panel;
pub mod reply;

use crate::state::AppState;
use axum::Router;

pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(reply::routes(state.clone()))
        .merge(agents::routes(state.clone()))
        .merge(panel::routes(state))
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::state::AppState;
    use squad::agents::setup::{build_default_squad, SquadSettings};
    use squad::models::agent::AgentConfig;

    /// State over the demo squad with no provider or panel credentials
    pub(crate) fn demo_state(streaming: bool) -> AppState {
        let settings = SquadSettings {
            agent: AgentConfig::default().with_streaming(streaming),
            ..Default::default()
        };
        AppState::new(build_default_squad(settings).unwrap())
    }
}
