// src/store/users.rs

use crate::models::user::{CreateUserRequest, UpdateUserRequest, User};

use super::{Result, Store, StoreError};

const USER_COLUMNS: &str = "nickname, fullname, about, email";

impl Store {
    /// Returns the user whose nickname matches case-insensitively.
    pub async fn get_user(&self, nickname: &str) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(nickname) = LOWER($1) LIMIT 1"
        ))
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Can't find user with nickname: {}", nickname)))
    }

    /// Users that already own the nickname or the email (at most two).
    pub async fn find_conflicting_users(&self, nickname: &str, email: &str) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE LOWER(nickname) = LOWER($1) OR LOWER(email) = LOWER($2)
             LIMIT 2"
        ))
        .bind(nickname)
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn create_user(&self, nickname: &str, req: &CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (nickname, fullname, about, email)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(nickname)
        .bind(&req.fullname)
        .bind(&req.about)
        .bind(&req.email)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(nickname = %user.nickname, "user created");
        Ok(user)
    }

    /// Applies a partial profile update. Empty fields keep their old value.
    pub async fn update_user(&self, nickname: &str, req: &UpdateUserRequest) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET fullname = COALESCE(NULLIF($1, ''), fullname),
                 about = COALESCE(NULLIF($2, ''), about),
                 email = COALESCE(NULLIF($3, ''), email)
             WHERE LOWER(nickname) = LOWER($4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(req.fullname.as_deref())
        .bind(req.about.as_deref())
        .bind(req.email.as_deref())
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Can't find user with nickname: {}", nickname)))
    }
}
