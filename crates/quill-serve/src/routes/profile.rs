//! Profile page handler.

use axum::extract::State;
use maud::Markup;

use crate::auth::SessionUser;
use crate::error::AppError;
use crate::pages;
use crate::state::AppState;
use crate::store;

/// `GET /profile` - the logged-in author's posts.
pub async fn show(State(state): State<AppState>, user: SessionUser) -> Result<Markup, AppError> {
    let posts = {
        let conn = state.db.lock();
        store::posts_by_author(&conn, user.id)?
    };
    Ok(pages::profile::profile(
        &state.config.site_name,
        &user,
        &posts,
    ))
}
