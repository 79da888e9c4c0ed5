//! Error responses.
//!
//! Every failure leaves the server as `{"error": {"code", "message", "fields"}}` with the
//! status taken from the clinic error that caused it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medico_core::{ClinicError, FieldError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    /// Per-field messages for rejected forms; empty otherwise.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldMessage>,
}

#[derive(Debug, Serialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

impl From<&FieldError> for FieldMessage {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field.to_string(),
            message: err.message.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Clinic(#[from] ClinicError),
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
            ApiError::Clinic(err) => match err {
                ClinicError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
                ClinicError::InvalidInput(_) | ClinicError::Text(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT")
                }
                ClinicError::UserNotFound(_)
                | ClinicError::PatientNotFound(_)
                | ClinicError::ProfessionalNotFound(_)
                | ClinicError::AppointmentNotFound(_)
                | ClinicError::NoUserForRole(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ClinicError::NotLoggedIn => (StatusCode::UNAUTHORIZED, "NOT_LOGGED_IN"),
                ClinicError::WrongRole { .. } => (StatusCode::FORBIDDEN, "WRONG_ROLE"),
                ClinicError::SlotUnavailable { .. } => (StatusCode::CONFLICT, "SLOT_UNAVAILABLE"),
                ClinicError::SeedRead(_) | ClinicError::SeedSchema { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "An internal error occurred".to_string()
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
            self.to_string()
        };

        let fields = match &self {
            ApiError::Clinic(ClinicError::Validation(errors)) => {
                errors.fields().iter().map(FieldMessage::from).collect()
            }
            _ => Vec::new(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                fields,
            },
        };
        (status, Json(body)).into_response()
    }
}
