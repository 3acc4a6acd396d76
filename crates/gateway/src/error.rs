//! Translation of advisor errors into the uniform `{ error, message, retry? }`
//! HTTP body.
//!
//! Provider messages and raw model output are logged here and never sent to
//! the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use careerpath_core::error::Error;
use serde::Serialize;
use tracing::{error, warn};

const MSG_BUSY: &str = "AI sedang sibuk. Coba lagi dalam beberapa saat ya!";
const MSG_RATE_LIMITED: &str = "Terlalu banyak request. Tunggu sebentar ya!";
const MSG_INTERNAL: &str = "Maaf, terjadi kesalahan. Coba lagi ya!";
const MSG_MALFORMED: &str = "Format respons dari AI tidak valid";

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<bool>,
}

/// An HTTP error ready to be rendered.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, message: &str, retry: Option<bool>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                message: message.into(),
                retry,
            },
        }
    }

    /// 400 with a caller-facing explanation. Never retryable as-is.
    pub fn bad_request(error: &str, message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message, None)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match &err {
            Error::Validation(detail) => {
                warn!(error = %err, "Rejected request");
                Self::bad_request("Invalid request", detail)
            }
            Error::TransientService(provider_err) => {
                warn!(error = %err, "AI provider still unavailable after retries");
                if provider_err.status_code() == Some(429) {
                    Self::new(
                        StatusCode::TOO_MANY_REQUESTS,
                        "Rate limit exceeded",
                        MSG_RATE_LIMITED,
                        Some(true),
                    )
                } else {
                    Self::new(
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Service temporarily unavailable",
                        MSG_BUSY,
                        Some(true),
                    )
                }
            }
            Error::MalformedResponse(_) => {
                error!(error = %err, "AI reply failed validation");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Gagal memproses hasil analisis",
                    MSG_MALFORMED,
                    Some(err.is_retryable()),
                )
            }
            Error::PermanentService(_) => {
                error!(error = %err, "Request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    MSG_INTERNAL,
                    Some(err.is_retryable()),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
