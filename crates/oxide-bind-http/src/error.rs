//! Error types for request decoding.

use thiserror::Error;

/// Errors raised while turning a request into form data.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The body stream failed before end-of-stream.
    #[error("failed to read request body: {0}")]
    Body(#[from] std::io::Error),

    /// The accumulated body exceeded the configured limit.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The request URL could not be parsed.
    #[error("invalid request url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A JSON body could not be decoded.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The method string is not a known HTTP method.
    #[error("unknown request method: {0}")]
    UnknownMethod(String),
}

/// Result type alias for request operations.
pub type Result<T> = std::result::Result<T, HttpError>;
