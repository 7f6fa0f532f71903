use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ralph_core::RalphError;
use ralph_provider::{AssembleError, ProviderError};

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain without touching the domain error enums.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }
}

fn ralph_status(e: &RalphError) -> StatusCode {
    match e {
        RalphError::PrdNotFound(_) => StatusCode::NOT_FOUND,
        RalphError::TaskCountOutOfRange { .. }
        | RalphError::MissingField(_)
        | RalphError::InputRejected(_)
        | RalphError::UnknownPreset(_) => StatusCode::BAD_REQUEST,
        RalphError::Store(_)
        | RalphError::Config(_)
        | RalphError::Io(_)
        | RalphError::Yaml(_)
        | RalphError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn provider_status(e: &ProviderError) -> StatusCode {
    match e {
        ProviderError::Http(_) | ProviderError::Timeout(_) | ProviderError::UnexpectedPayload(_) => {
            StatusCode::BAD_GATEWAY
        }
        ProviderError::MissingSecret(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ProviderError::OcrMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
        ProviderError::Ocr(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProviderError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        // Malformed provider output surfaces the raw completion so a human
        // can inspect what the model actually said.
        if let Some(e) = self.0.downcast_ref::<AssembleError>() {
            let (status, body) = match e {
                AssembleError::Input(inner) => (
                    ralph_status(inner),
                    serde_json::json!({ "error": inner.to_string() }),
                ),
                AssembleError::Provider(inner) => (
                    provider_status(inner),
                    serde_json::json!({ "error": inner.to_string() }),
                ),
                AssembleError::Malformed { raw, .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    serde_json::json!({ "error": e.to_string(), "raw": raw }),
                ),
            };
            return (status, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<RalphError>() {
            ralph_status(e)
        } else if let Some(e) = self.0.downcast_ref::<ProviderError>() {
            provider_status(e)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
