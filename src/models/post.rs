// src/models/post.rs

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{forum::Forum, thread::Thread, user::User};

/// Represents the 'posts' table in the database.
///
/// `path` is the materialized chain of ancestor ids ending with the post's own
/// id, so `path[0]` is the top-level post of the branch.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    /// 0 for top-level posts.
    #[serde(default)]
    pub parent: i64,
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub is_edited: bool,
    pub forum: String,
    pub thread: i64,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub path: Vec<i64>,
}

/// One element of a batch create request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPost {
    #[serde(default)]
    pub parent: i64,

    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,

    pub message: String,
}

/// DTO for editing a post's message.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub message: Option<String>,
}

/// Listing strategy for the posts of a thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// By id.
    #[default]
    Flat,
    /// By materialized path, so replies follow their parent.
    Tree,
    /// Paginated over top-level posts, each expanded with its whole subtree.
    ParentTree,
}

impl SortMode {
    /// Unknown or missing values fall back to `Flat`.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("tree") => SortMode::Tree,
            Some("parent_tree") => SortMode::ParentTree,
            _ => SortMode::Flat,
        }
    }
}

/// Query parameters for listing the posts of a thread.
#[derive(Debug, Deserialize)]
pub struct PostListParams {
    pub limit: Option<i64>,
    /// Id of the post to continue after.
    pub since: Option<i64>,
    pub desc: Option<bool>,
    pub sort: Option<String>,
}

/// Entities that can be embedded next to a post in the details response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Related {
    User,
    Forum,
    Thread,
}

/// Query parameters for fetching a single post.
#[derive(Debug, Default, Deserialize)]
pub struct PostDetailsParams {
    /// Comma separated list of `user`, `forum`, `thread`.
    pub related: Option<String>,
}

impl PostDetailsParams {
    /// Unknown entries are ignored.
    pub fn related(&self) -> BTreeSet<Related> {
        self.related
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|item| match item.trim() {
                "user" => Some(Related::User),
                "forum" => Some(Related::Forum),
                "thread" => Some(Related::Thread),
                _ => None,
            })
            .collect()
    }
}

/// A post together with the entities requested through `related`.
#[derive(Debug, Serialize)]
pub struct PostDetails {
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_falls_back_to_flat() {
        assert_eq!(SortMode::from_param(None), SortMode::Flat);
        assert_eq!(SortMode::from_param(Some("flat")), SortMode::Flat);
        assert_eq!(SortMode::from_param(Some("tree")), SortMode::Tree);
        assert_eq!(SortMode::from_param(Some("parent_tree")), SortMode::ParentTree);
        assert_eq!(SortMode::from_param(Some("TREE")), SortMode::Flat);
    }

    #[test]
    fn related_ignores_unknown_entries() {
        let params = PostDetailsParams {
            related: Some("thread,nonsense,user".to_string()),
        };
        let related: Vec<_> = params.related().into_iter().collect();
        assert_eq!(related, vec![Related::User, Related::Thread]);

        assert!(PostDetailsParams::default().related().is_empty());
    }

    #[test]
    fn post_serializes_camel_case() {
        let post = Post {
            id: 2,
            parent: 1,
            author: "jack".to_string(),
            message: "reply".to_string(),
            is_edited: false,
            forum: "pirates".to_string(),
            thread: 7,
            created: Utc::now(),
            path: vec![1, 2],
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["isEdited"], false);
        assert_eq!(value["path"], serde_json::json!([1, 2]));
    }

    #[test]
    fn new_post_defaults_to_top_level() {
        let post: NewPost =
            serde_json::from_str(r#"{"author": "jack", "message": "hello"}"#).unwrap();
        assert_eq!(post.parent, 0);
    }
}
