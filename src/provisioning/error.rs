use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Why a provisioning request was refused.
///
/// Authentication and authorization messages are fixed so lookup details
/// never reach the caller; downstream failures carry the service's message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Failed to verify user role")]
    AuthzLookupFailed,

    #[error("Only {role}s can create users")]
    Forbidden { role: String },

    #[error("{0}")]
    AccountCreationFailed(String),

    #[error("{0}")]
    LinkGenerationFailed(String),
}

impl ProvisionError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ProvisionError::InvalidRequest(_) => "INVALID_REQUEST",
            ProvisionError::Unauthenticated => "UNAUTHENTICATED",
            ProvisionError::AuthzLookupFailed => "AUTHZ_LOOKUP_FAILED",
            ProvisionError::Forbidden { .. } => "FORBIDDEN",
            ProvisionError::AccountCreationFailed(_) => "ACCOUNT_CREATION_FAILED",
            ProvisionError::LinkGenerationFailed(_) => "LINK_GENERATION_FAILED",
        }
    }

    /// Every refusal is reported as a client error.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

/// JSON body returned for refused requests.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ProvisionError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
