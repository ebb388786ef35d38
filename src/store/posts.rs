// src/store/posts.rs

//! Posts of a thread, stored as a tree.
//!
//! Every post carries `path`, the ids of its ancestors followed by its own id.
//! Postgres compares arrays lexicographically, so ordering by `path` yields a
//! depth-first walk of the thread and `path[1]` groups a top-level post with
//! all of its replies.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::models::{
    page::Page,
    post::{NewPost, Post, PostDetails, Related, SortMode, UpdatePostRequest},
    thread::{Thread, ThreadKey},
};

use super::{Result, Store, StoreError};

const POST_COLUMNS: &str =
    "id, COALESCE(parent, 0) AS parent, author, message, is_edited, forum, thread, created, path";

/// Rows per INSERT statement. Eight binds per row keeps a chunk well under
/// the 65535 bind parameters Postgres accepts.
const INSERT_CHUNK: usize = 1000;

#[derive(Debug, FromRow)]
struct ParentRow {
    id: i64,
    thread: i64,
    path: Vec<i64>,
}

#[derive(Debug)]
struct PostRow {
    id: i64,
    parent: Option<i64>,
    author: String,
    message: String,
    path: Vec<i64>,
}

impl Store {
    /// Inserts a batch of posts into `thread`.
    ///
    /// The whole batch shares one `created` timestamp. Parents are read with
    /// a key-share lock in the same transaction as the insert, so either every
    /// post lands or none does. An empty batch touches nothing.
    pub async fn create_posts(&self, thread: &Thread, posts: Vec<NewPost>) -> Result<Vec<Post>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;

        let parent_ids: Vec<i64> = posts
            .iter()
            .map(|post| post.parent)
            .filter(|&id| id != 0)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let parents: HashMap<i64, ParentRow> = if parent_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, ParentRow>(
                "SELECT id, thread, path FROM posts WHERE id = ANY($1) FOR KEY SHARE",
            )
            .bind(&parent_ids)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(|row| (row.id, row))
            .collect()
        };

        // Parent checks run before author resolution.
        let mut ancestry = Vec::with_capacity(posts.len());
        for post in &posts {
            if post.parent == 0 {
                ancestry.push((None, Vec::new()));
                continue;
            }
            match parents.get(&post.parent) {
                Some(parent) if parent.thread == thread.id => {
                    ancestry.push((Some(parent.id), parent.path.clone()));
                }
                _ => {
                    tracing::debug!(
                        thread = thread.id,
                        parent = post.parent,
                        "rejecting post batch: parent not in thread"
                    );
                    return Err(StoreError::Conflict(
                        "Parent post was created in another thread".to_string(),
                    ));
                }
            }
        }

        let wanted: Vec<String> = posts
            .iter()
            .map(|post| post.author.to_lowercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let authors: HashMap<String, String> = sqlx::query_scalar::<_, String>(
            "SELECT nickname FROM users WHERE LOWER(nickname) = ANY($1)",
        )
        .bind(&wanted)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|nickname| (nickname.to_lowercase(), nickname))
        .collect();

        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT nextval(pg_get_serial_sequence('posts', 'id')) FROM generate_series(1, $1)",
        )
        .bind(posts.len() as i64)
        .fetch_all(&mut *tx)
        .await?;

        let mut rows = Vec::with_capacity(posts.len());
        for ((post, (parent, mut path)), id) in posts.into_iter().zip(ancestry).zip(ids) {
            let author = authors
                .get(&post.author.to_lowercase())
                .cloned()
                .ok_or_else(|| {
                    StoreError::NotFound(format!(
                        "Can't find post author by nickname: {}",
                        post.author
                    ))
                })?;

            path.push(id);
            rows.push(PostRow {
                id,
                parent,
                author,
                message: post.message,
                path,
            });
        }

        let created = Utc::now();
        let mut inserted: HashMap<i64, Post> = HashMap::with_capacity(rows.len());
        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO posts (id, parent, author, message, forum, thread, created, path) ",
            );
            builder.push_values(chunk, |mut b, row| {
                b.push_bind(row.id)
                    .push_bind(row.parent)
                    .push_bind(row.author.clone())
                    .push_bind(row.message.clone())
                    .push_bind(thread.forum.clone())
                    .push_bind(thread.id)
                    .push_bind(created)
                    .push_bind(row.path.clone());
            });
            builder.push(format!(" RETURNING {POST_COLUMNS}"));

            let batch = builder.build_query_as::<Post>().fetch_all(&mut *tx).await?;
            inserted.extend(batch.into_iter().map(|post| (post.id, post)));
        }

        sqlx::query("UPDATE forums SET posts = posts + $1 WHERE slug = $2")
            .bind(rows.len() as i64)
            .bind(&thread.forum)
            .execute(&mut *tx)
            .await?;

        let nicknames: Vec<String> = authors.into_values().collect();
        sqlx::query(
            "INSERT INTO forum_users (forum, nickname)
             SELECT $1, UNNEST($2::TEXT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(&thread.forum)
        .bind(&nicknames)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(thread = thread.id, count = rows.len(), "posts created");

        // Same order as the request.
        Ok(rows
            .iter()
            .filter_map(|row| inserted.remove(&row.id))
            .collect())
    }

    /// Lists the posts of a thread in the order given by `mode`.
    ///
    /// For `Tree` and `ParentTree` the `since` cursor is resolved to the path
    /// of that post; an unknown `since` matches nothing.
    pub async fn get_posts(&self, thread_id: i64, mode: SortMode, page: &Page<i64>) -> Result<Vec<Post>> {
        let posts = posts_query(thread_id, mode, page)
            .build_query_as::<Post>()
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    pub async fn get_post(&self, id: i64) -> Result<Post> {
        sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Can't find post with id: {}", id)))
    }

    /// Fetches a post plus the requested related entities.
    pub async fn post_details(&self, id: i64, related: &BTreeSet<Related>) -> Result<PostDetails> {
        let post = self.get_post(id).await?;

        let mut details = PostDetails {
            post,
            author: None,
            forum: None,
            thread: None,
        };

        for item in related {
            match item {
                Related::User => {
                    details.author = Some(self.get_user(&details.post.author).await?);
                }
                Related::Forum => {
                    details.forum = Some(self.get_forum(&details.post.forum).await?);
                }
                Related::Thread => {
                    let key = ThreadKey::Id(details.post.thread);
                    details.thread = Some(self.get_thread(&key).await?);
                }
            }
        }

        Ok(details)
    }

    /// Replaces the message of a post. An empty or unchanged message leaves
    /// the post (and its `is_edited` flag) untouched.
    pub async fn update_post(&self, id: i64, req: &UpdatePostRequest) -> Result<Post> {
        let message = req.message.as_deref().unwrap_or_default();

        sqlx::query_as::<_, Post>(&format!(
            "UPDATE posts
             SET message = COALESCE(NULLIF($1, ''), message),
                 is_edited = CASE WHEN $1 = '' OR message = $1 THEN is_edited ELSE TRUE END
             WHERE id = $2
             RETURNING {POST_COLUMNS}"
        ))
        .bind(message)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Can't find post with id: {}", id)))
    }
}

fn posts_query(thread_id: i64, mode: SortMode, page: &Page<i64>) -> QueryBuilder<'static, Postgres> {
    match mode {
        SortMode::Flat => flat_query(thread_id, page),
        SortMode::Tree => tree_query(thread_id, page),
        SortMode::ParentTree => parent_tree_query(thread_id, page),
    }
}

fn push_limit(builder: &mut QueryBuilder<'static, Postgres>, limit: Option<i64>) {
    if let Some(limit) = limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }
}

/// Ordered by id; `since` compares ids directly.
fn flat_query(thread_id: i64, page: &Page<i64>) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE thread = "));
    builder.push_bind(thread_id);

    if let Some(since) = page.since {
        builder.push(if page.desc { " AND id < " } else { " AND id > " });
        builder.push_bind(since);
    }

    builder.push(if page.desc {
        " ORDER BY id DESC"
    } else {
        " ORDER BY id ASC"
    });
    push_limit(&mut builder, page.limit);

    builder
}

/// Ordered by path; `since` compares against the path of the `since` post.
fn tree_query(thread_id: i64, page: &Page<i64>) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE thread = "));
    builder.push_bind(thread_id);

    if let Some(since) = page.since {
        builder.push(if page.desc { " AND path < " } else { " AND path > " });
        builder.push("(SELECT s.path FROM posts s WHERE s.id = ");
        builder.push_bind(since);
        builder.push(")");
    }

    builder.push(if page.desc {
        " ORDER BY path DESC, id DESC"
    } else {
        " ORDER BY path ASC, id ASC"
    });
    push_limit(&mut builder, page.limit);

    builder
}

/// Pages over top-level posts, then expands each one to its full subtree.
/// `limit` counts top-level posts.
fn parent_tree_query(thread_id: i64, page: &Page<i64>) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE thread = "));
    builder.push_bind(thread_id);

    builder.push(" AND path[1] IN (SELECT r.id FROM posts r WHERE r.thread = ");
    builder.push_bind(thread_id);
    builder.push(" AND r.parent IS NULL");

    if let Some(since) = page.since {
        builder.push(if page.desc {
            " AND r.path[1] < "
        } else {
            " AND r.path[1] > "
        });
        builder.push("(SELECT s.path[1] FROM posts s WHERE s.id = ");
        builder.push_bind(since);
        builder.push(")");
    }

    builder.push(if page.desc {
        " ORDER BY r.id DESC"
    } else {
        " ORDER BY r.id ASC"
    });
    push_limit(&mut builder, page.limit);
    builder.push(")");

    builder.push(if page.desc {
        " ORDER BY path[1] DESC, path ASC, id ASC"
    } else {
        " ORDER BY path[1] ASC, path ASC, id ASC"
    });

    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(limit: Option<i64>, since: Option<i64>, desc: bool) -> Page<i64> {
        Page::new(limit, since, Some(desc)).unwrap()
    }

    #[test]
    fn flat_ascending_since_filters_greater_ids() {
        let builder = posts_query(1, SortMode::Flat, &page(Some(3), Some(5), false));
        let sql = builder.sql();

        assert!(sql.contains("WHERE thread = $1 AND id > $2"));
        assert!(sql.contains("ORDER BY id ASC LIMIT $3"));
    }

    #[test]
    fn flat_descending_since_filters_smaller_ids() {
        let builder = posts_query(1, SortMode::Flat, &page(None, Some(5), true));
        let sql = builder.sql();

        assert!(sql.contains("AND id < $2"));
        assert!(sql.ends_with("ORDER BY id DESC"));
    }

    #[test]
    fn tree_since_resolves_the_cursor_path() {
        let builder = posts_query(1, SortMode::Tree, &page(Some(10), Some(4), false));
        let sql = builder.sql();

        assert!(sql.contains("AND path > (SELECT s.path FROM posts s WHERE s.id = $2)"));
        assert!(sql.contains("ORDER BY path ASC, id ASC LIMIT $3"));
    }

    #[test]
    fn tree_descending_orders_by_path_then_id_descending() {
        let builder = posts_query(1, SortMode::Tree, &page(None, None, true));
        let sql = builder.sql();

        assert!(sql.ends_with("ORDER BY path DESC, id DESC"));
        assert!(!sql.contains("s.path"));
    }

    #[test]
    fn parent_tree_limit_applies_to_roots_only() {
        let builder = posts_query(1, SortMode::ParentTree, &page(Some(2), None, false));
        let sql = builder.sql();

        assert!(sql.contains("r.parent IS NULL ORDER BY r.id ASC LIMIT $3)"));
        assert!(sql.ends_with("ORDER BY path[1] ASC, path ASC, id ASC"));
    }

    #[test]
    fn parent_tree_descending_keeps_subtrees_ascending() {
        let builder = posts_query(1, SortMode::ParentTree, &page(None, Some(8), true));
        let sql = builder.sql();

        assert!(sql.contains("AND r.path[1] < (SELECT s.path[1] FROM posts s WHERE s.id = $3)"));
        assert!(sql.contains("ORDER BY r.id DESC)"));
        assert!(sql.ends_with("ORDER BY path[1] DESC, path ASC, id ASC"));
    }
}
