use thiserror::Error;

/// Errors raised while talking to the market service
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request never produced a response (DNS, connect, reset, ...)
    #[error("Request Error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx response
    #[error("HTTP Error ({status}): {body}")]
    Status { status: u16, body: String },
    /// Body was not the expected JSON shape
    #[error("Deserialization Error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Transport failures and non-2xx responses both count as network failures.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Status { .. })
    }
}
