// src/handlers/forum.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        forum::{CreateForumRequest, ForumUserListParams},
        page::Page,
        thread::{CreateThreadRequest, ThreadKey, ThreadListParams},
    },
    store::{Store, StoreError},
};

/// Default page size for the forum users listing.
const DEFAULT_USERS_LIMIT: i64 = 100;

/// Creates a forum. If the slug is taken, responds 409 with the existing forum.
pub async fn create_forum(
    State(store): State<Store>,
    Json(payload): Json<CreateForumRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    match store.create_forum(&payload).await {
        Ok(forum) => Ok((StatusCode::CREATED, Json(forum)).into_response()),
        Err(StoreError::Conflict(_)) => {
            let existing = store.get_forum(&payload.slug).await?;
            Ok((StatusCode::CONFLICT, Json(existing)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_forum(
    State(store): State<Store>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let forum = store.get_forum(&slug).await?;
    Ok(Json(forum))
}

/// Opens a thread in the forum. If the thread slug is taken, responds 409
/// with the existing thread.
pub async fn create_thread(
    State(store): State<Store>,
    Path(slug): Path<String>,
    Json(payload): Json<CreateThreadRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    match store.create_thread(&slug, &payload).await {
        Ok(thread) => Ok((StatusCode::CREATED, Json(thread)).into_response()),
        Err(StoreError::Conflict(msg)) => match payload.slug() {
            Some(thread_slug) => {
                let key = ThreadKey::Slug(thread_slug.to_string());
                let existing = store.get_thread(&key).await?;
                Ok((StatusCode::CONFLICT, Json(existing)).into_response())
            }
            None => Err(AppError::Conflict(msg)),
        },
        Err(e) => Err(e.into()),
    }
}

/// Lists the users who wrote threads or posts in the forum.
pub async fn list_users(
    State(store): State<Store>,
    Path(slug): Path<String>,
    Query(params): Query<ForumUserListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = Page::new(params.limit, params.since, params.desc)?
        .with_default_limit(DEFAULT_USERS_LIMIT);

    let users = store.forum_users(&slug, &page).await?;
    Ok(Json(users))
}

/// Lists the threads of the forum by creation time.
pub async fn list_threads(
    State(store): State<Store>,
    Path(slug): Path<String>,
    Query(params): Query<ThreadListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = Page::new(params.limit, params.since, params.desc)?;

    let threads = store.forum_threads(&slug, &page).await?;
    Ok(Json(threads))
}
