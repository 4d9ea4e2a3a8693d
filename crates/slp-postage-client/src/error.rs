//! Error types for the post office client.

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Post office client errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network failure talking to a post office
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Post office served a document that is not a postage quote
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Operation cancelled
    #[error("Cancelled")]
    Cancelled,

    /// Core postage error
    #[error(transparent)]
    Core(#[from] slp_postage_core::Error),
}
