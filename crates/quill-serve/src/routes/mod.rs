//! HTTP route handlers.

mod auth;
mod health;
mod home;
mod posts;
mod profile;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/page/{page}", get(home::page))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/profile", get(profile::show))
        .route("/create", get(posts::create_form).post(posts::create))
        .route("/edit/{id}", get(posts::edit_form).post(posts::edit))
        .route("/delete/{id}", post(posts::delete))
        .route("/health", get(health::health))
        .with_state(state)
}
