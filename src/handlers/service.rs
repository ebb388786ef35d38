// src/handlers/service.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{error::AppError, store::Store};

pub async fn status(State(store): State<Store>) -> Result<impl IntoResponse, AppError> {
    let status = store.status().await?;
    Ok(Json(status))
}

pub async fn clear(State(store): State<Store>) -> Result<impl IntoResponse, AppError> {
    store.clear().await?;
    Ok(StatusCode::OK)
}
