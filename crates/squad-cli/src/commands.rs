pub mod agents;
pub mod export;
pub mod panel;
pub mod run;
pub mod session;
