/// Errors from the GraphQL persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Configuration is missing or malformed.
    #[error("Remote configuration error: {0}")]
    Config(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("GraphQL endpoint error ({status}): {body}")]
    Endpoint {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response carried GraphQL-level errors.
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The response was 2xx but the expected data field was absent.
    #[error("GraphQL response missing data for field '{field}'")]
    MissingData { field: &'static str },
}
