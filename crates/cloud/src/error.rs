/// Errors from the cloud function layer.
///
/// Upstream failure messages are carried verbatim; the operator sees them
/// unchanged. No call in this layer is ever retried.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The envelope came back with a non-200 code.
    #[error("{message}")]
    Api { message: String },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Cloud function request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected envelope shape.
    #[error("Malformed cloud function response: {0}")]
    Decode(String),
}

pub type CloudResult<T> = Result<T, CloudError>;
