//! Request pipeline errors
//!
//! Every gate and controller returns `AppError`; the `IntoResponse` impl is the
//! single place errors become envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::engine::rbac::{AuthenticationError, AuthorizationError};
use crate::engine::response::Envelope;
use crate::engine::validation::FieldError;

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const QUERY_VALIDATION_FAILED: &str = "Query validation failed";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: &'static str,
        errors: Vec<FieldError>,
        dto_in: Value,
    },

    #[error("{message}")]
    BadRequest {
        message: String,
        dto_in: Option<Value>,
    },

    #[error("{0}")]
    Authentication(#[from] AuthenticationError),

    #[error("{message}")]
    Authorization {
        message: String,
        dto_in: Option<Value>,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        dto_in: Option<Value>,
    },

    #[error("{message}")]
    ServiceUnavailable {
        message: String,
        dto_in: Option<Value>,
    },

    #[error("Internal server error")]
    Internal {
        detail: Option<String>,
        dto_in: Option<Value>,
    },
}

impl AppError {
    pub fn validation(errors: Vec<FieldError>, dto_in: Value) -> Self {
        AppError::Validation {
            message: VALIDATION_FAILED,
            errors,
            dto_in,
        }
    }

    pub fn query_validation(errors: Vec<FieldError>, query: Value) -> Self {
        AppError::Validation {
            message: QUERY_VALIDATION_FAILED,
            errors,
            dto_in: query,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            dto_in: None,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Authorization {
            message: message.into(),
            dto_in: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
            dto_in: None,
        }
    }

    /// Log `err` and hide it from the caller unless `development` is set
    pub fn internal(err: impl std::fmt::Display, development: bool) -> Self {
        tracing::error!(error = %err, "internal server error");
        AppError::Internal {
            detail: development.then(|| err.to_string()),
            dto_in: None,
        }
    }

    /// Attach the request input echoed back to the caller
    pub fn with_dto_in(mut self, value: Value) -> Self {
        match &mut self {
            AppError::Validation { dto_in, .. } => *dto_in = value,
            AppError::BadRequest { dto_in, .. }
            | AppError::Authorization { dto_in, .. }
            | AppError::NotFound { dto_in, .. }
            | AppError::ServiceUnavailable { dto_in, .. }
            | AppError::Internal { dto_in, .. } => *dto_in = Some(value),
            AppError::Authentication(_) => {}
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        match self {
            AppError::Validation {
                message,
                errors,
                dto_in,
            } => {
                let mut param_map = Map::new();
                param_map.insert("errors".to_string(), json!(errors));
                Envelope::error_with_key("validation", message, param_map, Some(dto_in.clone()))
            }
            AppError::Authentication(err) => Envelope::error(&err.to_string(), Map::new(), None),
            AppError::Internal { detail, dto_in } => {
                let mut param_map = Map::new();
                if let Some(detail) = detail {
                    param_map.insert("error".to_string(), Value::String(detail.clone()));
                }
                Envelope::error(INTERNAL_SERVER_ERROR, param_map, dto_in.clone())
            }
            AppError::BadRequest { message, dto_in }
            | AppError::Authorization { message, dto_in }
            | AppError::NotFound { message, dto_in }
            | AppError::ServiceUnavailable { message, dto_in } => {
                Envelope::error(message, Map::new(), dto_in.clone())
            }
        }
    }
}

impl From<AuthorizationError> for AppError {
    fn from(err: AuthorizationError) -> Self {
        let message = err.to_string();
        match err {
            AuthorizationError::MissingResource => AppError::bad_request(message),
            AuthorizationError::Forbidden { .. } => AppError::forbidden(message),
            AuthorizationError::Unavailable(_) => AppError::ServiceUnavailable {
                message,
                dto_in: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_envelope())).into_response()
    }
}

pub type ApiResult<T> = Result<T, AppError>;
