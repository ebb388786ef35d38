// src/store/service.rs

use crate::models::status::Status;

use super::{Result, Store};

impl Store {
    pub async fn status(&self) -> Result<Status> {
        let status = sqlx::query_as::<_, Status>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM forums) AS forum,
                (SELECT COUNT(*) FROM posts) AS post,
                (SELECT COUNT(*) FROM threads) AS thread,
                (SELECT COUNT(*) FROM users) AS "user"
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(status)
    }

    /// Empties every domain table.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("TRUNCATE TABLE votes, posts, threads, forum_users, forums, users CASCADE")
            .execute(&self.pool)
            .await?;

        tracing::info!("all forum data cleared");
        Ok(())
    }
}
