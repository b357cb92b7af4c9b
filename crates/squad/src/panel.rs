//! Client for the NeonPanel REST API.
//!
//! Every operation issues a single bearer-authenticated request and returns
//! the decoded JSON, or a [`RemoteTransportError`] describing what went wrong.
//! When no API key is configured the client runs in demo mode and answers
//! from [`demo`] without touching the network.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumIter, EnumString};

pub mod client;
pub mod config;
pub mod demo;
pub mod error;

pub use client::PanelClient;
pub use config::PanelConfig;
pub use error::RemoteTransportError;

/// A key-value snapshot returned by the panel API
pub type Record = Map<String, Value>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ServerAction {
    Start,
    Stop,
    Restart,
    Status,
}
