//! Application error type and HTTP response mapping.
//!
//! Domain errors from `quill-core` are mapped to user-facing HTML pages
//! with appropriate statuses; infrastructure errors are logged and hidden
//! behind a generic message. `Unauthorized` redirects to the login page
//! instead, since this is a browser-facing HTML application.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use quill_core::Error as DomainError;

use crate::pages;

/// Application error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level failure (auth, validation, ownership, lookup).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Password hashing or verification infrastructure failure.
    #[error("password hashing error: {0}")]
    Hash(String),

    /// Anything else unexpected.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Convenience constructor for ownership failures.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::Forbidden(msg.into()))
    }

    /// Convenience constructor for missing records.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::NotFound(msg.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::Domain(DomainError::Unauthorized) => {
                return Redirect::to("/login").into_response();
            }
            Self::Domain(DomainError::DuplicateUser { field }) => (
                StatusCode::CONFLICT,
                "Already Registered",
                format!("That {field} is already registered."),
            ),
            Self::Domain(DomainError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "Login Failed",
                "Invalid username or password.".to_string(),
            ),
            Self::Domain(DomainError::Validation(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid Input",
                msg.clone(),
            ),
            Self::Domain(DomainError::NotFound(msg)) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                format!("The requested resource was not found: {msg}"),
            ),
            Self::Domain(DomainError::Forbidden(_)) => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                "You can only modify your own posts.".to_string(),
            ),
            Self::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service Unavailable",
                    "The database is temporarily unavailable. Please try again later.".to_string(),
                )
            }
            Self::Hash(err) => {
                tracing::error!(error = %err, "password hashing error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
        };

        (status, pages::error_page(title, &message)).into_response()
    }
}
