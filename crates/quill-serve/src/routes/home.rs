//! Home feed handlers.

use axum::extract::{Path, State};
use maud::Markup;

use crate::auth::{OptionalSession, SessionUser};
use crate::error::AppError;
use crate::pages;
use crate::state::AppState;
use crate::store;

/// `GET /` - first page of the feed.
pub async fn index(
    State(state): State<AppState>,
    OptionalSession(user): OptionalSession,
) -> Result<Markup, AppError> {
    render_feed(&state, user.as_ref(), 1)
}

/// `GET /page/{page}` - a later feed page.
pub async fn page(
    State(state): State<AppState>,
    OptionalSession(user): OptionalSession,
    Path(page): Path<i64>,
) -> Result<Markup, AppError> {
    render_feed(&state, user.as_ref(), page)
}

fn render_feed(
    state: &AppState,
    user: Option<&SessionUser>,
    page: i64,
) -> Result<Markup, AppError> {
    let feed = {
        let conn = state.db.lock();
        store::feed_page(&conn, page)?
    };
    Ok(pages::home::feed(&state.config.site_name, user, &feed))
}
