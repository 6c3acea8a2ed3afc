/// Errors from the model endpoint layer.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status; the body often carries the
    /// upstream failure message and is kept for the operator.
    #[error("Model endpoint error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A 2xx response whose body lacks the expected content (no choices,
    /// no image URL).
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// A required API key is not configured.
    #[error("Missing API key: {0}")]
    MissingApiKey(&'static str),
}

pub type AiResult<T> = Result<T, AiError>;
