// src/store/mod.rs

//! Database access for every forum entity.
//!
//! All SQL lives here. Errors coming out of `sqlx` are classified once, in
//! `From<sqlx::Error> for StoreError`, so callers only ever see `NotFound`,
//! `Conflict` or `Internal`.

pub mod forums;
pub mod posts;
pub mod service;
pub mod threads;
pub mod users;
pub mod votes;

use axum::extract::FromRef;
use sqlx::PgPool;
use thiserror::Error;

use crate::state::AppState;

/// SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
/// Keeps a reply in the thread of its parent; a violation is a conflict, not a
/// missing entity.
pub(crate) const PARENT_THREAD_CONSTRAINT: &str = "posts_parent_thread_fkey";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Internal(#[source] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    NotFound,
    Conflict,
    Internal,
}

fn classify(code: Option<&str>, constraint: Option<&str>) -> ErrorKind {
    match (code, constraint) {
        (Some(FOREIGN_KEY_VIOLATION), Some(PARENT_THREAD_CONSTRAINT)) => ErrorKind::Conflict,
        (Some(FOREIGN_KEY_VIOLATION), _) => ErrorKind::NotFound,
        (Some(UNIQUE_VIOLATION), _) => ErrorKind::Conflict,
        _ => ErrorKind::Internal,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return StoreError::NotFound("Not found".to_string());
        }

        let (code, constraint) = match err.as_database_error() {
            Some(db_err) => (
                db_err.code().map(|c| c.into_owned()),
                db_err.constraint().map(str::to_owned),
            ),
            None => (None, None),
        };

        match classify(code.as_deref(), constraint.as_deref()) {
            ErrorKind::NotFound => {
                tracing::debug!("foreign key violation: {}", err);
                StoreError::NotFound("Referenced resource not found".to_string())
            }
            ErrorKind::Conflict => {
                tracing::debug!("constraint violation: {}", err);
                StoreError::Conflict(match constraint.as_deref() {
                    Some(PARENT_THREAD_CONSTRAINT) => {
                        "Parent post was created in another thread".to_string()
                    }
                    _ => "Resource already exists".to_string(),
                })
            }
            ErrorKind::Internal => StoreError::Internal(err),
        }
    }
}

/// Handle to the database shared by all request handlers.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        Store::new(state.pool.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_violations_are_not_found() {
        assert_eq!(
            classify(Some("23503"), Some("posts_author_fkey")),
            ErrorKind::NotFound
        );
        assert_eq!(classify(Some("23503"), None), ErrorKind::NotFound);
    }

    #[test]
    fn parent_in_another_thread_is_a_conflict() {
        assert_eq!(
            classify(Some("23503"), Some(PARENT_THREAD_CONSTRAINT)),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn unique_violations_are_conflicts() {
        assert_eq!(
            classify(Some("23505"), Some("users_email_lower_idx")),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn everything_else_is_internal() {
        assert_eq!(classify(Some("42P01"), None), ErrorKind::Internal);
        assert_eq!(classify(None, None), ErrorKind::Internal);
    }

    #[test]
    fn non_database_errors_stay_internal() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Internal(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound(_)
        ));
    }
}
