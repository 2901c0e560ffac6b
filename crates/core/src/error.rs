#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("failed to build request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request to recipe database failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("recipe database returned HTTP {status} for {endpoint}")]
    Status {
        endpoint: &'static str,
        status: u16,
    },
    #[error("failed to decode recipe database response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("suggestion fetcher has shut down")]
    FetcherClosed,
}

pub type RecipeResult<T> = std::result::Result<T, RecipeError>;
