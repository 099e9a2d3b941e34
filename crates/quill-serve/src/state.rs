//! Application state shared across all request handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use parking_lot::Mutex;
use rusqlite::Connection;

use crate::config::Config;
use crate::store;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection, shared behind a mutex. Handlers lock only for
    /// the duration of their statements.
    pub db: Arc<Mutex<Connection>>,

    /// Application configuration.
    pub config: Arc<Config>,

    /// Key for signing and verifying session cookies.
    pub key: Key,
}

impl AppState {
    /// Open the database, ensure the schema exists, and build the state.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let conn = store::open(&config.db_path)?;
        store::init_schema(&conn)?;

        let key = Key::derive_from(config.secret_key.as_bytes());

        tracing::info!(db_path = %config.db_path.display(), "application state initialized");

        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
            config: Arc::new(config),
            key,
        })
    }
}

/// Lets `SignedCookieJar` be used as an extractor against `AppState`.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}
