//! Post create, edit, and delete handlers. All require a session.

use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use maud::Markup;
use serde::Deserialize;

use quill_core::Error as DomainError;

use crate::auth::SessionUser;
use crate::error::AppError;
use crate::pages;
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
pub struct PostForm {
    title: String,
    content: String,
}

/// `GET /create`
pub async fn create_form(State(state): State<AppState>, user: SessionUser) -> Markup {
    pages::forms::post_editor(
        &state.config.site_name,
        &user,
        "New post",
        "/create",
        None,
        "",
        "",
    )
}

/// `POST /create`
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let result = {
        let conn = state.db.lock();
        store::create_post(&conn, user.id, &form.title, &form.content)
    };

    match result {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(AppError::Domain(err @ DomainError::Validation(_))) => {
            let page = pages::forms::post_editor(
                &state.config.site_name,
                &user,
                "New post",
                "/create",
                Some(&err.to_string()),
                &form.title,
                &form.content,
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(other) => Err(other),
    }
}

/// `GET /edit/{id}` - prefilled editor, owner only.
pub async fn edit_form(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<i64>,
) -> Result<Markup, AppError> {
    let post = {
        let conn = state.db.lock();
        store::post_by_id(&conn, id)?
    }
    .ok_or_else(|| AppError::not_found(format!("post {id}")))?;

    if post.author_id != user.id {
        return Err(AppError::forbidden(format!(
            "post {id} belongs to another author"
        )));
    }

    Ok(pages::forms::post_editor(
        &state.config.site_name,
        &user,
        "Edit post",
        &format!("/edit/{id}"),
        None,
        &post.title,
        &post.content_md,
    ))
}

/// `POST /edit/{id}`
pub async fn edit(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let result = {
        let conn = state.db.lock();
        store::update_post(&conn, id, user.id, &form.title, &form.content)
    };

    match result {
        Ok(()) => Ok(Redirect::to("/profile").into_response()),
        Err(AppError::Domain(err @ DomainError::Validation(_))) => {
            let page = pages::forms::post_editor(
                &state.config.site_name,
                &user,
                "Edit post",
                &format!("/edit/{id}"),
                Some(&err.to_string()),
                &form.title,
                &form.content,
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(other) => Err(other),
    }
}

/// `POST /delete/{id}`
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    {
        let conn = state.db.lock();
        store::delete_post(&conn, id, user.id)?;
    }
    Ok(Redirect::to("/profile"))
}
