use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquadError {
    #[error("Request text is empty")]
    EmptyRequest,

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Agent already registered: {0}")]
    DuplicateAgent(String),

    #[error("No agents registered")]
    NoAgentsRegistered,
}

pub type SquadResult<T> = Result<T, SquadError>;
