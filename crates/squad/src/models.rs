//! Data passed between the presentation layer, the orchestrator and the agents.
//!
//! Messages are the only records that outlive a request: callers keep them in a
//! [`crate::history::ChatSession`] and hand the recent ones back in a
//! [`context::RequestContext`]. Routing contexts and responses are built per
//! request and dropped once the caller is done with them.
pub mod agent;
pub mod context;
pub mod message;
pub mod response;
