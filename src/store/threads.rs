// src/store/threads.rs

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::models::{
    page::Page,
    thread::{CreateThreadRequest, Thread, ThreadKey, UpdateThreadRequest},
};

use super::{Result, Store, StoreError};

pub(crate) const THREAD_COLUMNS: &str = "id, title, author, forum, message, votes, slug, created";

impl Store {
    /// Resolves a thread by numeric id or by slug (case-insensitive).
    pub async fn get_thread(&self, key: &ThreadKey) -> Result<Thread> {
        let thread = match key {
            ThreadKey::Id(id) => {
                sqlx::query_as::<_, Thread>(&format!(
                    "SELECT {THREAD_COLUMNS} FROM threads WHERE id = $1"
                ))
                .bind(*id)
                .fetch_optional(&self.pool)
                .await?
            }
            ThreadKey::Slug(slug) => {
                sqlx::query_as::<_, Thread>(&format!(
                    "SELECT {THREAD_COLUMNS} FROM threads WHERE LOWER(slug) = LOWER($1) LIMIT 1"
                ))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        thread.ok_or_else(|| StoreError::NotFound(format!("Can't find thread by slug or id: {}", key)))
    }

    /// Creates a thread in the forum `forum_slug`.
    ///
    /// The insert, the forum's thread counter and the participant record are
    /// written in one transaction. A duplicate slug is a `Conflict`.
    pub async fn create_thread(&self, forum_slug: &str, req: &CreateThreadRequest) -> Result<Thread> {
        let forum = self.get_forum(forum_slug).await?;
        let author = self.get_user(&req.author).await?;

        let mut tx = self.pool.begin().await?;

        let thread = sqlx::query_as::<_, Thread>(&format!(
            "INSERT INTO threads (title, author, forum, message, slug, created)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
             RETURNING {THREAD_COLUMNS}"
        ))
        .bind(&req.title)
        .bind(&author.nickname)
        .bind(&forum.slug)
        .bind(&req.message)
        .bind(req.slug())
        .bind(req.created)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE forums SET threads = threads + 1 WHERE slug = $1")
            .bind(&forum.slug)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO forum_users (forum, nickname) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(&forum.slug)
        .bind(&author.nickname)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(id = thread.id, forum = %thread.forum, "thread created");
        Ok(thread)
    }

    /// Applies a partial update. Empty fields keep their old value.
    pub async fn update_thread(&self, key: &ThreadKey, req: &UpdateThreadRequest) -> Result<Thread> {
        let thread = self.get_thread(key).await?;

        let updated = sqlx::query_as::<_, Thread>(&format!(
            "UPDATE threads
             SET title = COALESCE(NULLIF($1, ''), title),
                 message = COALESCE(NULLIF($2, ''), message)
             WHERE id = $3
             RETURNING {THREAD_COLUMNS}"
        ))
        .bind(req.title.as_deref())
        .bind(req.message.as_deref())
        .bind(thread.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Threads of a forum ordered by creation time. `since` is inclusive.
    pub async fn forum_threads(&self, slug: &str, page: &Page<DateTime<Utc>>) -> Result<Vec<Thread>> {
        let forum = self.get_forum(slug).await?;

        let threads = forum_threads_query(&forum.slug, page)
            .build_query_as::<Thread>()
            .fetch_all(&self.pool)
            .await?;

        Ok(threads)
    }
}

fn forum_threads_query(forum: &str, page: &Page<DateTime<Utc>>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {THREAD_COLUMNS} FROM threads WHERE forum = "
    ));
    builder.push_bind(forum.to_string());

    if let Some(since) = page.since {
        builder.push(if page.desc { " AND created <= " } else { " AND created >= " });
        builder.push_bind(since);
    }

    builder.push(if page.desc {
        " ORDER BY created DESC, id DESC"
    } else {
        " ORDER BY created ASC, id ASC"
    });

    if let Some(limit) = page.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }

    builder
}
