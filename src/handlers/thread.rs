// src/handlers/thread.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        page::Page,
        post::{NewPost, PostListParams, SortMode},
        thread::{ThreadKey, UpdateThreadRequest},
        vote::VoteRequest,
    },
    store::Store,
};

/// Creates a batch of posts in the thread addressed by slug or id.
/// An empty batch is accepted and creates nothing.
pub async fn create_posts(
    State(store): State<Store>,
    Path(slug_or_id): Path<String>,
    Json(payload): Json<Vec<NewPost>>,
) -> Result<impl IntoResponse, AppError> {
    for post in &payload {
        post.validate()?;
    }

    let thread = store.get_thread(&ThreadKey::parse(&slug_or_id)).await?;
    let posts = store.create_posts(&thread, payload).await?;

    Ok((StatusCode::CREATED, Json(posts)))
}

pub async fn get_thread(
    State(store): State<Store>,
    Path(slug_or_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let thread = store.get_thread(&ThreadKey::parse(&slug_or_id)).await?;
    Ok(Json(thread))
}

pub async fn update_thread(
    State(store): State<Store>,
    Path(slug_or_id): Path<String>,
    Json(payload): Json<UpdateThreadRequest>,
) -> Result<impl IntoResponse, AppError> {
    let thread = store
        .update_thread(&ThreadKey::parse(&slug_or_id), &payload)
        .await?;
    Ok(Json(thread))
}

/// Lists the posts of a thread.
///
/// * `sort`: `flat` (default), `tree` or `parent_tree`.
/// * `since`: id of the post to continue after.
/// * `limit`: for `parent_tree`, the number of top-level posts.
pub async fn list_posts(
    State(store): State<Store>,
    Path(slug_or_id): Path<String>,
    Query(params): Query<PostListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = Page::new(params.limit, params.since, params.desc)?;
    let mode = SortMode::from_param(params.sort.as_deref());

    let thread = store.get_thread(&ThreadKey::parse(&slug_or_id)).await?;
    let posts = store.get_posts(thread.id, mode, &page).await?;

    Ok(Json(posts))
}

/// Votes on a thread and returns it with the updated total.
pub async fn vote(
    State(store): State<Store>,
    Path(slug_or_id): Path<String>,
    Json(payload): Json<VoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let thread = store.get_thread(&ThreadKey::parse(&slug_or_id)).await?;
    let thread = store.vote(&thread, &payload).await?;

    Ok(Json(thread))
}
