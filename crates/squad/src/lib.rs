pub mod agents;
pub mod errors;
pub mod history;
pub mod models;
pub mod orchestrator;
pub mod panel;
pub mod providers;
pub mod registry;
pub mod router;
