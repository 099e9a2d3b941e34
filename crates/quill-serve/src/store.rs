//! SQLite schema and queries for users and posts.
//!
//! All functions take a plain `&Connection` so they can run against an
//! in-memory database in tests. Ownership checks happen here, before any
//! UPDATE or DELETE statement runs, so a non-owning request can never
//! partially mutate a row.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use quill_core::{Error as DomainError, Post, PostSummary, User, render_markdown, validate};

use crate::error::AppError;

/// Posts shown per feed page.
pub const POSTS_PER_PAGE: u32 = 5;

/// One page of the home feed plus pagination metadata.
#[derive(Debug)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    /// The page actually served (requests below 1 are clamped to 1).
    pub page: u32,
    /// Total pages, always at least 1.
    pub total_pages: u32,
}

/// Open the database file with foreign keys enforced.
pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// Create tables if they do not exist. Idempotent.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS posts (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            author_id    INTEGER NOT NULL,
            title        TEXT NOT NULL,
            content_md   TEXT NOT NULL,
            content_html TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL,
            FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE
        );",
    )?;
    tracing::debug!("schema ensured");
    Ok(())
}

/// Current time as a fixed-width RFC 3339 string, lexicographically
/// sortable (microsecond precision, Z suffix).
fn now_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp, falling back to the epoch on corruption.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert a new user. Fails with `DuplicateUser` naming the colliding
/// field when the username or email is already taken.
pub fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    if user_exists(conn, "username", username)? {
        return Err(DomainError::DuplicateUser { field: "username" }.into());
    }
    if user_exists(conn, "email", email)? {
        return Err(DomainError::DuplicateUser { field: "email" }.into());
    }

    let created_at = now_string();
    conn.execute(
        "INSERT INTO users (username, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![username, email, password_hash, created_at],
    )?;
    let id = conn.last_insert_rowid();

    tracing::info!(user_id = id, username = %username, "user registered");

    Ok(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at: parse_timestamp(&created_at),
    })
}

fn user_exists(conn: &Connection, column: &str, value: &str) -> Result<bool, AppError> {
    // `column` is one of two compile-time literals, never user input.
    let sql = format!("SELECT 1 FROM users WHERE {column} = ?1");
    let hit: Option<i64> = conn
        .query_row(&sql, params![value], |row| row.get(0))
        .optional()?;
    Ok(hit.is_some())
}

/// Look up a user by username.
pub fn user_by_username(conn: &Connection, username: &str) -> Result<Option<User>, AppError> {
    let user = conn
        .query_row(
            "SELECT id, username, email, password_hash, created_at
             FROM users WHERE username = ?1",
            params![username],
            map_user,
        )
        .optional()?;
    Ok(user)
}

/// Look up a user by id.
pub fn user_by_id(conn: &Connection, id: i64) -> Result<Option<User>, AppError> {
    let user = conn
        .query_row(
            "SELECT id, username, email, password_hash, created_at
             FROM users WHERE id = ?1",
            params![id],
            map_user,
        )
        .optional()?;
    Ok(user)
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_timestamp(&row.get::<_, String>(4)?),
    })
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Fetch one page of the feed, newest first.
///
/// Page numbers below 1 are treated as 1. Ties on `created_at` break by
/// `id` descending so pagination stays deterministic.
pub fn feed_page(conn: &Connection, requested_page: i64) -> Result<FeedPage, AppError> {
    // Keep the arithmetic in i64: path parameters can exceed u32.
    let requested = requested_page.max(1);
    let page = u32::try_from(requested).unwrap_or(u32::MAX);
    let offset = (requested - 1).saturating_mul(i64::from(POSTS_PER_PAGE));

    let total: u32 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
    let total_pages = total.div_ceil(POSTS_PER_PAGE).max(1);

    let mut stmt = conn.prepare(
        "SELECT posts.id, posts.author_id, users.username, posts.title,
                posts.content_md, posts.content_html, posts.created_at, posts.updated_at
         FROM posts JOIN users ON users.id = posts.author_id
         ORDER BY posts.created_at DESC, posts.id DESC
         LIMIT ?1 OFFSET ?2",
    )?;
    let posts = stmt
        .query_map(params![POSTS_PER_PAGE, offset], map_post)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(FeedPage {
        posts,
        page,
        total_pages,
    })
}

/// Fetch a single post with its author's username.
pub fn post_by_id(conn: &Connection, id: i64) -> Result<Option<Post>, AppError> {
    let post = conn
        .query_row(
            "SELECT posts.id, posts.author_id, users.username, posts.title,
                    posts.content_md, posts.content_html, posts.created_at, posts.updated_at
             FROM posts JOIN users ON users.id = posts.author_id
             WHERE posts.id = ?1",
            params![id],
            map_post,
        )
        .optional()?;
    Ok(post)
}

/// Create a post for `author_id`. Fails with `Validation` on empty title
/// or content. Returns the new post id.
pub fn create_post(
    conn: &Connection,
    author_id: i64,
    title: &str,
    content_md: &str,
) -> Result<i64, AppError> {
    let title = title.trim();
    let content_md = content_md.trim();
    validate::post(title, content_md)?;

    let content_html = render_markdown(content_md);
    let now = now_string();

    conn.execute(
        "INSERT INTO posts (author_id, title, content_md, content_html, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![author_id, title, content_md, content_html, now],
    )?;
    let id = conn.last_insert_rowid();

    tracing::info!(post_id = id, author_id, "post created");
    Ok(id)
}

/// Update a post's title and content, re-rendering the HTML.
///
/// Fails with `NotFound` if the post is absent and `Forbidden` if
/// `author_id` does not own it.
pub fn update_post(
    conn: &Connection,
    post_id: i64,
    author_id: i64,
    title: &str,
    content_md: &str,
) -> Result<(), AppError> {
    check_ownership(conn, post_id, author_id)?;

    let title = title.trim();
    let content_md = content_md.trim();
    validate::post(title, content_md)?;

    let content_html = render_markdown(content_md);
    conn.execute(
        "UPDATE posts SET title = ?1, content_md = ?2, content_html = ?3, updated_at = ?4
         WHERE id = ?5",
        params![title, content_md, content_html, now_string(), post_id],
    )?;

    tracing::info!(post_id, author_id, "post updated");
    Ok(())
}

/// Delete a post. Same `NotFound`/`Forbidden` rules as update.
pub fn delete_post(conn: &Connection, post_id: i64, author_id: i64) -> Result<(), AppError> {
    check_ownership(conn, post_id, author_id)?;
    conn.execute("DELETE FROM posts WHERE id = ?1", params![post_id])?;
    tracing::info!(post_id, author_id, "post deleted");
    Ok(())
}

/// All posts by one author, newest first, for the profile page.
pub fn posts_by_author(conn: &Connection, author_id: i64) -> Result<Vec<PostSummary>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, created_at, updated_at FROM posts
         WHERE author_id = ?1
         ORDER BY created_at DESC, id DESC",
    )?;
    let posts = stmt
        .query_map(params![author_id], |row| {
            Ok(PostSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                created_at: parse_timestamp(&row.get::<_, String>(2)?),
                updated_at: parse_timestamp(&row.get::<_, String>(3)?),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(posts)
}

/// Verify the post exists and belongs to `author_id`.
fn check_ownership(conn: &Connection, post_id: i64, author_id: i64) -> Result<(), AppError> {
    let owner: Option<i64> = conn
        .query_row(
            "SELECT author_id FROM posts WHERE id = ?1",
            params![post_id],
            |row| row.get(0),
        )
        .optional()?;

    match owner {
        None => Err(AppError::not_found(format!("post {post_id}"))),
        Some(owner) if owner != author_id => {
            tracing::warn!(post_id, author_id, owner, "ownership check failed");
            Err(AppError::forbidden(format!(
                "post {post_id} belongs to another author"
            )))
        }
        Some(_) => Ok(()),
    }
}

fn map_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        author_id: row.get(1)?,
        author: row.get(2)?,
        title: row.get(3)?,
        content_md: row.get(4)?,
        content_html: row.get(5)?,
        created_at: parse_timestamp(&row.get::<_, String>(6)?),
        updated_at: parse_timestamp(&row.get::<_, String>(7)?),
    })
}
