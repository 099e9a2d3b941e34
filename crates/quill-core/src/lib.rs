//! Quill Core - domain logic for the Quill blogging application.
//!
//! This crate holds everything that does not touch HTTP or the database:
//!
//! - **Models**: the `User` and `Post` records
//! - **Errors**: the domain error taxonomy shared by all operations
//! - **Validation**: server-side field rules for registration and posts
//! - **Rendering**: the Markdown → sanitized HTML pipeline
//!
//! # Security
//!
//! [`render::render_markdown`] is the only function that produces HTML meant
//! to be embedded unescaped. Its output is sanitized against an explicit
//! allow-list of tags, attributes, and URL schemes, so script-capable
//! constructs (`<script>`, inline event handlers, `javascript:` URLs) can
//! never reach a page.

pub mod error;
pub mod model;
pub mod render;
pub mod validate;

pub use error::{Error, Result};
pub use model::{Post, PostSummary, User};
pub use render::render_markdown;
