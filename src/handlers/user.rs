// src/handlers/user.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{CreateUserRequest, UpdateUserRequest},
    store::{Store, StoreError},
};

/// Registers a user under the nickname from the path.
/// On a nickname or email clash, responds 409 with the clashing users.
pub async fn create_user(
    State(store): State<Store>,
    Path(nickname): Path<String>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let existing = store.find_conflicting_users(&nickname, &payload.email).await?;
    if !existing.is_empty() {
        return Ok((StatusCode::CONFLICT, Json(existing)).into_response());
    }

    match store.create_user(&nickname, &payload).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user)).into_response()),
        // Lost a race against a concurrent registration.
        Err(StoreError::Conflict(_)) => {
            let existing = store.find_conflicting_users(&nickname, &payload.email).await?;
            Ok((StatusCode::CONFLICT, Json(existing)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_user(
    State(store): State<Store>,
    Path(nickname): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = store.get_user(&nickname).await?;
    Ok(Json(user))
}

/// Partial profile update.
pub async fn update_user(
    State(store): State<Store>,
    Path(nickname): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.without_empty();
    payload.validate()?;

    let user = store
        .update_user(&nickname, &payload)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => AppError::Conflict(format!(
                "This email is already registered by another user: {}",
                payload.email.as_deref().unwrap_or_default()
            )),
            e => e.into(),
        })?;

    Ok(Json(user))
}
