//! Errors raised at the permission administration boundary.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::{Display, Error};

/// Errors returned by the permission expression service and its handlers.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum PermissionError {
    /// The expression failed validation and was not stored.
    #[display("Bad Request: invalid permission expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// No stored expression matches the id or permission code.
    #[display("Not Found: no permission expression for {key}")]
    NotFound { key: String },

    /// Another stored expression already uses the permission code.
    #[display("Conflict: permission code '{code}' already exists")]
    DuplicateCode { code: String },
}

impl PermissionError {
    pub(crate) fn not_found_id(id: u64) -> Self {
        PermissionError::NotFound {
            key: format!("id {}", id),
        }
    }

    pub(crate) fn not_found_code(code: &str) -> Self {
        PermissionError::NotFound {
            key: format!("code '{}'", code),
        }
    }
}

impl ResponseError for PermissionError {
    fn status_code(&self) -> StatusCode {
        match self {
            PermissionError::InvalidExpression { .. } => StatusCode::BAD_REQUEST,
            PermissionError::NotFound { .. } => StatusCode::NOT_FOUND,
            PermissionError::DuplicateCode { .. } => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error = status.canonical_reason().unwrap_or("Error");

        HttpResponse::build(status).json(serde_json::json!({
            "error": error,
            "message": self.to_string(),
        }))
    }
}
