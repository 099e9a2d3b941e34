//! Password hashing and cookie-session authentication.
//!
//! Passwords are stored as Argon2id PHC strings; the session is a signed
//! cookie holding the user id. Handlers that need an identity take
//! [`SessionUser`] as an extractor argument - there is no ambient session
//! state anywhere.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::extract::FromRef;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use rusqlite::Connection;

use quill_core::{Error as DomainError, User, validate};

use crate::error::AppError;
use crate::state::AppState;
use crate::store;

/// Name of the signed session cookie. Its value is the user id.
pub const SESSION_COOKIE: &str = "quill_session";

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// A malformed stored hash counts as a failed verification rather than an
/// error; the caller cannot tell the difference and should not.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Register a new user: validate fields, hash the password, insert.
///
/// The plaintext password is never stored.
pub fn register(
    conn: &Connection,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let username = username.trim();
    let email = email.trim().to_lowercase();
    validate::registration(username, &email, password)?;

    let password_hash = hash_password(password)?;
    store::insert_user(conn, username, &email, &password_hash)
}

/// Authenticate a username/password pair.
///
/// Fails with `InvalidCredentials` whether the user is absent or the
/// password is wrong; the two cases are indistinguishable to the caller.
pub fn authenticate(conn: &Connection, username: &str, password: &str) -> Result<User, AppError> {
    let user = store::user_by_username(conn, username.trim())?;
    match user {
        Some(user) if verify_password(&user.password_hash, password) => Ok(user),
        _ => {
            tracing::debug!(username = %username.trim(), "login rejected");
            Err(DomainError::InvalidCredentials.into())
        }
    }
}

/// Build the session cookie for a freshly authenticated user.
pub fn session_cookie(user_id: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie used to clear the session on logout.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// The authenticated identity attached to a request.
///
/// As an extractor this is the `require_session` gate: handlers that list
/// it as an argument reject unauthenticated requests with `Unauthorized`
/// (which renders as a redirect to the login page).
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// Like [`SessionUser`], but for pages that merely adapt to login state.
#[derive(Debug, Clone, Default)]
pub struct OptionalSession(pub Option<SessionUser>);

/// Resolve the session cookie (if any) to a live user.
///
/// Returns `Ok(None)` for missing, unsigned, malformed, or dangling
/// cookies; only real database failures surface as errors.
fn resolve_session(state: &AppState, headers: &HeaderMap) -> Result<Option<SessionUser>, AppError> {
    let jar = SignedCookieJar::from_headers(headers, state.key.clone());
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let Ok(user_id) = cookie.value().parse::<i64>() else {
        tracing::debug!("session cookie with non-numeric value");
        return Ok(None);
    };

    let conn = state.db.lock();
    let user = store::user_by_id(&conn, user_id)?;
    Ok(user.map(|u| SessionUser {
        id: u.id,
        username: u.username,
    }))
}

impl<S> FromRequestParts<S> for SessionUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        resolve_session(&app, &parts.headers)?.ok_or_else(|| DomainError::Unauthorized.into())
    }
}

impl<S> FromRequestParts<S> for OptionalSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        Ok(OptionalSession(resolve_session(&app, &parts.headers)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        store::init_schema(&conn).unwrap();
        conn
    }

    fn domain(err: AppError) -> DomainError {
        match err {
            AppError::Domain(e) => e,
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "hunter22"));
        assert!(!verify_password(&hash, "hunter23"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_rejects_malformed_stored_hash() {
        assert!(!verify_password("not-a-phc-string", "whatever"));
    }

    #[test]
    fn register_stores_hash_not_plaintext() {
        let conn = test_db();
        let user = register(&conn, "alice", "Alice@Example.com", "hunter22").unwrap();
        assert_ne!(user.password_hash, "hunter22");
        // Email normalized to lowercase.
        assert_eq!(user.email, "alice@example.com");
        assert!(verify_password(&user.password_hash, "hunter22"));
    }

    #[test]
    fn register_rejects_invalid_fields() {
        let conn = test_db();
        let err = register(&conn, "al", "alice@example.com", "hunter22").unwrap_err();
        assert!(matches!(domain(err), DomainError::Validation(_)));
    }

    #[test]
    fn register_rejects_duplicates() {
        let conn = test_db();
        register(&conn, "alice", "alice@example.com", "hunter22").unwrap();
        let err = register(&conn, "alice", "fresh@example.com", "hunter22").unwrap_err();
        assert!(matches!(
            domain(err),
            DomainError::DuplicateUser { field: "username" }
        ));
        let err = register(&conn, "bob", "alice@example.com", "hunter22").unwrap_err();
        assert!(matches!(
            domain(err),
            DomainError::DuplicateUser { field: "email" }
        ));
    }

    #[test]
    fn authenticate_success() {
        let conn = test_db();
        register(&conn, "alice", "alice@example.com", "hunter22").unwrap();
        let user = authenticate(&conn, "alice", "hunter22").unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn authenticate_wrong_password_fails() {
        let conn = test_db();
        register(&conn, "alice", "alice@example.com", "hunter22").unwrap();
        let err = authenticate(&conn, "alice", "wrong-password").unwrap_err();
        assert!(matches!(domain(err), DomainError::InvalidCredentials));
    }

    #[test]
    fn authenticate_unknown_user_fails_identically() {
        let conn = test_db();
        let err = authenticate(&conn, "ghost", "whatever").unwrap_err();
        assert!(matches!(domain(err), DomainError::InvalidCredentials));
    }

    #[test]
    fn session_cookie_shape() {
        let cookie = session_cookie(42);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "42");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
