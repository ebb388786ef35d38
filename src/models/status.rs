// src/models/status.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row counts returned by the service status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Status {
    pub forum: i64,
    pub post: i64,
    pub thread: i64,
    pub user: i64,
}
