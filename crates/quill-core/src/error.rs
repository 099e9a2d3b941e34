//! Domain error taxonomy for Quill operations.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by auth and post-store operations.
///
/// Every variant is recovered at the request boundary and surfaced as a
/// user-facing message; none is fatal to the process.
#[derive(Error, Debug)]
pub enum Error {
    /// Registration collided with an existing username or email.
    #[error("already registered: {field}")]
    DuplicateUser {
        /// Which unique field collided ("username" or "email").
        field: &'static str,
    },

    /// Login failed - unknown user or wrong password, indistinguishably.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A private operation was attempted without a valid session.
    #[error("login required")]
    Unauthorized,

    /// A submitted field failed server-side validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The acting user does not own the targeted resource.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_user_display_names_field() {
        let err = Error::DuplicateUser { field: "username" };
        let msg = err.to_string();
        assert!(msg.contains("already registered"));
        assert!(msg.contains("username"));
    }

    #[test]
    fn invalid_credentials_display_is_generic() {
        // Must not leak whether the username or the password was wrong.
        let err = Error::InvalidCredentials;
        assert_eq!(err.to_string(), "invalid credentials");
    }

    #[test]
    fn validation_display_carries_message() {
        let err = Error::Validation("title must not be empty".to_string());
        assert!(err.to_string().contains("title must not be empty"));
    }

    #[test]
    fn not_found_display() {
        let err = Error::NotFound("post 42".to_string());
        assert_eq!(err.to_string(), "not found: post 42");
    }

    #[test]
    fn forbidden_display() {
        let err = Error::Forbidden("post 7 belongs to another author".to_string());
        assert!(err.to_string().starts_with("forbidden:"));
    }

    #[test]
    fn result_alias_round_trip() {
        let ok: Result<u32> = Ok(5);
        assert!(matches!(ok, Ok(5)));
        let err: Result<u32> = Err(Error::Unauthorized);
        assert!(err.is_err());
    }
}
