//! Quill Serve - the HTTP application for the Quill blog.
//!
//! This crate wires the domain logic from `quill-core` into an axum server:
//! a paginated public feed, cookie-session authentication, and author-owned
//! post CRUD, all rendered server-side with maud.
//!
//! # Architecture
//!
//! - **AppState**: shared state (SQLite connection, config, cookie key)
//! - **Store**: schema and parameterized SQL over `users` and `posts`
//! - **Auth**: Argon2 password hashing and the `SessionUser` extractor
//! - **Pages**: maud templates (layout shell, feed, forms, profile)
//! - **Routes**: handlers grouped by concern
//!
//! # Sessions
//!
//! The session is a signed cookie carrying the user id. Signing uses a key
//! derived from `QUILL_SECRET_KEY`; handlers receive the identity as an
//! explicit [`auth::SessionUser`] argument, never as ambient state.

pub mod auth;
pub mod config;
pub mod error;
pub mod pages;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::AppError;
pub use routes::router;
pub use state::AppState;
