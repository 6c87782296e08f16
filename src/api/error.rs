use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use super::{ApiResponse, FormErrorResponse, SeeOther};
use crate::services::{AuthError, MovieError, ReviewError, UserError};
use crate::validation::ValidationErrors;

pub const SIGN_IN_PATH: &str = "/signin";
pub const SIGN_IN_ALERT: &str = "Please sign in first!";
pub const ACCESS_DENIED_ALERT: &str = "Unauthorized access!";
pub const INVALID_CREDENTIALS_ALERT: &str = "Invalid email/username and password combination!";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationFailed {
        errors: ValidationErrors,
        form: serde_json::Value,
    },

    InvalidCredentials {
        form: serde_json::Value,
    },

    /// Missing or insufficient identity; answered with a redirect.
    Unauthorized {
        location: &'static str,
        alert: &'static str,
    },

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ValidationFailed { errors, .. } => write!(f, "Validation failed: {errors}"),
            Self::InvalidCredentials { .. } => f.write_str("Invalid credentials"),
            Self::Unauthorized { alert, .. } => write!(f, "Unauthorized: {alert}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Self::ValidationFailed { errors, form } => {
                let body = FormErrorResponse {
                    success: false,
                    error: "Validation failed".to_string(),
                    errors,
                    form,
                };
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            Self::InvalidCredentials { form } => {
                let body = FormErrorResponse {
                    success: false,
                    error: INVALID_CREDENTIALS_ALERT.to_string(),
                    errors: ValidationErrors::new(),
                    form,
                };
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            Self::Unauthorized { location, alert } => {
                return SeeOther::alert(location, alert).into_response();
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::InternalError(format!("Session error: {err}"))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials {
                form: serde_json::Value::Null,
            },
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::NotFound(id) => Self::not_found("Movie", id),
            MovieError::Validation(errors) => Self::validation_failed(errors),
            MovieError::Database(msg) => Self::DatabaseError(msg),
            MovieError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::MovieNotFound(id) => Self::not_found("Movie", id),
            ReviewError::Validation(errors) => Self::validation_failed(errors),
            ReviewError::Database(msg) => Self::DatabaseError(msg),
            ReviewError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => Self::not_found("User", id),
            UserError::UnknownUsername(name) => Self::not_found("User", name),
            UserError::Validation(errors) => Self::validation_failed(errors),
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    #[must_use]
    pub const fn validation_failed(errors: ValidationErrors) -> Self {
        Self::ValidationFailed {
            errors,
            form: serde_json::Value::Null,
        }
    }

    /// Attaches the submitted values to a form error; other errors pass through.
    #[must_use]
    pub fn with_form(self, submitted: &impl Serialize) -> Self {
        let echo = || serde_json::to_value(submitted).unwrap_or_default();
        match self {
            Self::ValidationFailed { errors, .. } => Self::ValidationFailed {
                errors,
                form: echo(),
            },
            Self::InvalidCredentials { .. } => Self::InvalidCredentials { form: echo() },
            other => other,
        }
    }

    #[must_use]
    pub const fn sign_in_required() -> Self {
        Self::Unauthorized {
            location: SIGN_IN_PATH,
            alert: SIGN_IN_ALERT,
        }
    }

    #[must_use]
    pub const fn access_denied() -> Self {
        Self::Unauthorized {
            location: "/",
            alert: ACCESS_DENIED_ALERT,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}
