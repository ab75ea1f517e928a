use thiserror::Error;

/// Result type for catalog access
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog answered with status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("could not establish a catalog session: {0}")]
    Session(String),

    #[error("unexpected catalog payload: {0}")]
    Malformed(String),

    #[error("{what} is not a mapping")]
    NotAMapping { what: &'static str },

    #[error("limit must be between 1 and {max}, got {got}")]
    InvalidLimit { got: u32, max: u32 },

    #[error("limit must be a positive integer")]
    NonPositiveLimit,
}

impl CatalogError {
    /// True for failures of the upstream service itself, as opposed to bad
    /// input from the caller or a payload we cannot interpret.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            CatalogError::Http(_) | CatalogError::Status { .. } | CatalogError::Session(_)
        )
    }
}
