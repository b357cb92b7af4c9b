use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteTransportError {
    #[error("NeonPanel request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("NeonPanel returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Unexpected NeonPanel response: {0}")]
    UnexpectedBody(String),
}

pub type PanelResult<T> = Result<T, RemoteTransportError>;
