// src/store/forums.rs

use sqlx::{Postgres, QueryBuilder};

use crate::models::{
    forum::{CreateForumRequest, Forum},
    page::Page,
    user::User,
};

use super::{Result, Store, StoreError};

const FORUM_COLUMNS: &str = r#"title, author AS "user", slug, posts, threads"#;

impl Store {
    /// Returns the forum whose slug matches case-insensitively.
    pub async fn get_forum(&self, slug: &str) -> Result<Forum> {
        sqlx::query_as::<_, Forum>(&format!(
            "SELECT {FORUM_COLUMNS} FROM forums WHERE LOWER(slug) = LOWER($1) LIMIT 1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Can't find forum with slug: {}", slug)))
    }

    /// Creates a forum owned by `req.user`. The owner is stored with the
    /// nickname's canonical casing.
    pub async fn create_forum(&self, req: &CreateForumRequest) -> Result<Forum> {
        let owner = self.get_user(&req.user).await?;

        let forum = sqlx::query_as::<_, Forum>(&format!(
            "INSERT INTO forums (slug, title, author)
             VALUES ($1, $2, $3)
             RETURNING {FORUM_COLUMNS}"
        ))
        .bind(&req.slug)
        .bind(&req.title)
        .bind(&owner.nickname)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(slug = %forum.slug, "forum created");
        Ok(forum)
    }

    /// Distinct authors of threads and posts in the forum, ordered by
    /// lower-cased nickname. `since` is an exclusive nickname cursor.
    pub async fn forum_users(&self, slug: &str, page: &Page<String>) -> Result<Vec<User>> {
        let forum = self.get_forum(slug).await?;

        let users = forum_users_query(&forum.slug, page)
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}

fn forum_users_query(forum: &str, page: &Page<String>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT u.nickname, u.fullname, u.about, u.email
         FROM forum_users fu
         JOIN users u ON u.nickname = fu.nickname
         WHERE fu.forum = ",
    );
    builder.push_bind(forum.to_string());

    if let Some(since) = &page.since {
        builder.push(if page.desc {
            " AND LOWER(u.nickname) < LOWER("
        } else {
            " AND LOWER(u.nickname) > LOWER("
        });
        builder.push_bind(since.clone());
        builder.push(")");
    }

    builder.push(if page.desc {
        " ORDER BY LOWER(u.nickname) DESC"
    } else {
        " ORDER BY LOWER(u.nickname) ASC"
    });

    if let Some(limit) = page.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }

    builder
}
