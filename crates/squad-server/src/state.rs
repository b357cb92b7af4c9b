use squad::agents::setup::Squad;
use squad::orchestrator::Orchestrator;
use squad::panel::PanelClient;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub panel: Arc<PanelClient>,
}

impl AppState {
    pub fn new(squad: Squad) -> Self {
        Self {
            orchestrator: Arc::new(squad.orchestrator),
            panel: squad.panel,
        }
    }
}
