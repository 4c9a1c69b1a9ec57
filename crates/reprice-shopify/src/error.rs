use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid store \"{store}\": {reason}")]
    InvalidStore { store: String, reason: String },

    #[error("access token contains characters not allowed in an HTTP header")]
    InvalidAccessToken,
}
