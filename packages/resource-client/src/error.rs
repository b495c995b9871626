use thiserror::Error;

/// Error type for page requests
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Request aborted")]
    Aborted,

    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Error type for binding a controller to its page elements
#[derive(Debug, Error)]
pub enum MountError {
    #[error("Element not found: #{0}")]
    MissingElement(String),

    #[error("Failed to bind filters: {0}")]
    Bind(String),
}
