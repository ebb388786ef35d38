// src/store/votes.rs

use crate::models::{thread::Thread, vote::VoteRequest};

use super::{Result, Store, threads::THREAD_COLUMNS};

impl Store {
    /// Records `req` as the voter's voice on `thread` and returns the thread
    /// with its recomputed vote total.
    ///
    /// The thread row is locked first, so concurrent voters on one thread
    /// recompute the total one after another and each sum sees every
    /// committed vote.
    pub async fn vote(&self, thread: &Thread, req: &VoteRequest) -> Result<Thread> {
        let voter = self.get_user(&req.nickname).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM threads WHERE id = $1 FOR UPDATE")
            .bind(thread.id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO votes (author, thread, voice) VALUES ($1, $2, $3)
             ON CONFLICT (author, thread) DO UPDATE SET voice = EXCLUDED.voice",
        )
        .bind(&voter.nickname)
        .bind(thread.id)
        .bind(req.voice as i16)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, Thread>(&format!(
            "UPDATE threads
             SET votes = (SELECT COALESCE(SUM(voice), 0) FROM votes WHERE thread = $1)
             WHERE id = $1
             RETURNING {THREAD_COLUMNS}"
        ))
        .bind(thread.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(thread = thread.id, votes = updated.votes, "vote recorded");

        Ok(updated)
    }
}
