// src/models/thread.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'threads' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    #[serde(default)]
    pub votes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created: DateTime<Utc>,
}

/// DTO for creating a thread inside a forum. The forum comes from the path.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateThreadRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,

    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,

    pub message: String,

    /// Defaults to the insertion time.
    pub created: Option<DateTime<Utc>>,

    pub slug: Option<String>,
}

impl CreateThreadRequest {
    /// Empty slugs are treated as absent.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }
}

/// DTO for updating a thread. Missing or empty fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateThreadRequest {
    pub title: Option<String>,
    pub message: Option<String>,
}

/// Query parameters for listing the threads of a forum.
#[derive(Debug, Deserialize)]
pub struct ThreadListParams {
    pub limit: Option<i64>,
    /// Inclusive creation-time cursor.
    pub since: Option<DateTime<Utc>>,
    pub desc: Option<bool>,
}

/// A thread is addressed either by its numeric id or by its slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadKey {
    Id(i64),
    Slug(String),
}

impl ThreadKey {
    /// Numeric input is always an id; anything else is a slug.
    pub fn parse(slug_or_id: &str) -> Self {
        match slug_or_id.parse::<i64>() {
            Ok(id) => ThreadKey::Id(id),
            Err(_) => ThreadKey::Slug(slug_or_id.to_string()),
        }
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadKey::Id(id) => write!(f, "{}", id),
            ThreadKey::Slug(slug) => f.write_str(slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_key_prefers_numeric_ids() {
        assert_eq!(ThreadKey::parse("42"), ThreadKey::Id(42));
        assert_eq!(
            ThreadKey::parse("pirates-42"),
            ThreadKey::Slug("pirates-42".to_string())
        );
        assert_eq!(ThreadKey::parse("pirates-42").to_string(), "pirates-42");
    }

    #[test]
    fn empty_slug_is_absent() {
        let req: CreateThreadRequest = serde_json::from_value(serde_json::json!({
            "title": "Davy Jones cache",
            "author": "jack",
            "message": "An urgent need to reveal the hiding place.",
            "slug": ""
        }))
        .unwrap();
        assert_eq!(req.slug(), None);
        assert!(req.created.is_none());
    }
}
