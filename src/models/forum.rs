// src/models/forum.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'forums' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Forum {
    pub title: String,
    /// Nickname of the forum owner.
    pub user: String,
    pub slug: String,
    #[serde(default)]
    pub posts: i64,
    #[serde(default)]
    pub threads: i64,
}

/// DTO for creating a new forum.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateForumRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,

    #[validate(length(min = 1, message = "user must not be empty"))]
    pub user: String,

    #[validate(length(min = 1, max = 100, message = "slug length must be between 1 and 100 chars"))]
    pub slug: String,
}

/// Query parameters for listing the users of a forum.
#[derive(Debug, Deserialize)]
pub struct ForumUserListParams {
    pub limit: Option<i64>,
    /// Exclusive nickname cursor.
    pub since: Option<String>,
    pub desc: Option<bool>,
}
