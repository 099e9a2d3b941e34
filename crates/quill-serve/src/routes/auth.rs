//! Registration, login, and logout handlers.
//!
//! Validation and credential failures re-render the form with an inline
//! notice and the user's input preserved, rather than bouncing through the
//! standalone error page. Everything else falls through to [`AppError`].

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use quill_core::Error as DomainError;

use crate::auth;
use crate::auth::OptionalSession;
use crate::error::AppError;
use crate::pages;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NextParams {
    next: Option<String>,
}

/// Only follow same-site relative redirect targets.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") => n,
        _ => "/",
    }
}

/// `GET /register`
pub async fn register_form(
    State(state): State<AppState>,
    OptionalSession(user): OptionalSession,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    pages::forms::register(&state.config.site_name, None, "", "").into_response()
}

/// `POST /register` - create the account and log straight in.
pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let result = {
        let conn = state.db.lock();
        auth::register(&conn, &form.username, &form.email, &form.password)
    };

    let user = match result {
        Ok(user) => user,
        Err(AppError::Domain(err @ DomainError::Validation(_)))
        | Err(AppError::Domain(err @ DomainError::DuplicateUser { .. })) => {
            let status = match &err {
                DomainError::DuplicateUser { .. } => StatusCode::CONFLICT,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let page = pages::forms::register(
                &state.config.site_name,
                Some(&err.to_string()),
                form.username.trim(),
                form.email.trim(),
            );
            return Ok((status, page).into_response());
        }
        Err(other) => return Err(other),
    };

    let jar = jar.add(auth::session_cookie(user.id));
    Ok((jar, Redirect::to("/")).into_response())
}

/// `GET /login`
pub async fn login_form(
    State(state): State<AppState>,
    OptionalSession(user): OptionalSession,
    Query(params): Query<NextParams>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    pages::forms::login(&state.config.site_name, None, "", params.next.as_deref())
        .into_response()
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let result = {
        let conn = state.db.lock();
        auth::authenticate(&conn, &form.username, &form.password)
    };

    let user = match result {
        Ok(user) => user,
        Err(AppError::Domain(DomainError::InvalidCredentials)) => {
            let page = pages::forms::login(
                &state.config.site_name,
                Some("Invalid username or password."),
                form.username.trim(),
                form.next.as_deref(),
            );
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
        Err(other) => return Err(other),
    };

    tracing::info!(user_id = user.id, username = %user.username, "login");
    let jar = jar.add(auth::session_cookie(user.id));
    Ok((jar, Redirect::to(safe_next(form.next.as_deref()))).into_response())
}

/// `GET /logout` - clear the session cookie.
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    (jar.remove(auth::removal_cookie()), Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_next_accepts_relative_paths() {
        assert_eq!(safe_next(Some("/create")), "/create");
        assert_eq!(safe_next(Some("/edit/3")), "/edit/3");
    }

    #[test]
    fn safe_next_rejects_external_targets() {
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("create")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
