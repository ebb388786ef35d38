// src/handlers/post.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::post::{PostDetailsParams, UpdatePostRequest},
    store::Store,
};

/// Get a single post, optionally with its author, forum and thread.
pub async fn get_post(
    State(store): State<Store>,
    Path(id): Path<i64>,
    Query(params): Query<PostDetailsParams>,
) -> Result<impl IntoResponse, AppError> {
    let details = store.post_details(id, &params.related()).await?;
    Ok(Json(details))
}

pub async fn update_post(
    State(store): State<Store>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let post = store.update_post(id, &payload).await?;
    Ok(Json(post))
}
