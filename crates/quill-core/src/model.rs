//! Database-backed record types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered user.
///
/// The password hash is never serialized to clients.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub email: String,
    /// Argon2id PHC string, never the plaintext password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A blog post as displayed on the feed or an edit form.
///
/// `content_html` is rendered from `content_md` at write time by
/// [`crate::render::render_markdown`] and is safe to embed unescaped.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    /// Owning user id; mutation requests must match it.
    pub author_id: i64,
    /// Owning user's username (joined in for display).
    pub author: String,
    pub title: String,
    pub content_md: String,
    pub content_html: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reduced post row for the profile listing.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
