use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use faceglow_ai::AiError;
use faceglow_cloud::CloudError;
use faceglow_core::error::CoreError;
use faceglow_pipeline::PipelineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, cloud and model error types and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "error": message, "code": CODE }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `faceglow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A cloud function call failed.
    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// A model endpoint call failed.
    #[error(transparent)]
    Model(#[from] AiError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource with a human-readable message.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Pipeline errors fold into the wrapped source error so that, for example,
/// a cloud failure inside a commit reports the same way as a direct one.
impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(msg) => AppError::BadRequest(msg),
            PipelineError::NoSuchItem(index) => {
                AppError::NotFound(format!("No wizard item at index {index}"))
            }
            PipelineError::WrongStep { .. } => AppError::BadRequest(err.to_string()),
            PipelineError::Model(inner) => AppError::Model(inner),
            PipelineError::Cloud(inner) => AppError::Cloud(inner),
            PipelineError::Core(inner) => AppError::Core(inner),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Cloud function errors ---
            // The cloud functions return curated, user-facing messages, so
            // `Api` passes the message through verbatim.
            AppError::Cloud(cloud) => match cloud {
                CloudError::Api { message } => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message.clone())
                }
                CloudError::Transport(err) => {
                    tracing::error!(error = %err, "Cloud function transport error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_UNREACHABLE",
                        "Cloud function request failed".to_string(),
                    )
                }
                CloudError::Decode(msg) => {
                    tracing::error!(error = %msg, "Cloud function decode error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        "Cloud function returned an unreadable response".to_string(),
                    )
                }
            },

            // --- Model endpoint errors ---
            AppError::Model(model) => match model {
                AiError::MissingApiKey(var) => {
                    tracing::error!(var, "Model API key missing");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
                other => {
                    tracing::error!(error = %other, "Model endpoint error");
                    (StatusCode::BAD_GATEWAY, "MODEL_ERROR", other.to_string())
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
