// src/models/page.rs

use crate::error::AppError;

/// Cursor pagination shared by every listing endpoint.
///
/// `since` is a cursor whose meaning depends on the listing (a post id, a
/// thread creation time, a nickname). `limit == None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<S> {
    pub limit: Option<i64>,
    pub since: Option<S>,
    pub desc: bool,
}

impl<S> Default for Page<S> {
    fn default() -> Self {
        Self {
            limit: None,
            since: None,
            desc: false,
        }
    }
}

impl<S> Page<S> {
    /// Builds a page from raw query parameters. A limit of 0 is treated as
    /// absent; negative limits are rejected.
    pub fn new(limit: Option<i64>, since: Option<S>, desc: Option<bool>) -> Result<Self, AppError> {
        let limit = match limit {
            None | Some(0) => None,
            Some(n) if n > 0 => Some(n),
            Some(n) => {
                return Err(AppError::BadRequest(format!(
                    "limit must be a positive integer, got {}",
                    n
                )));
            }
        };

        Ok(Self {
            limit,
            since,
            desc: desc.unwrap_or(false),
        })
    }

    pub fn with_default_limit(mut self, limit: i64) -> Self {
        if self.limit.is_none() {
            self.limit = Some(limit);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_missing_limit_are_unbounded() {
        let page = Page::<i64>::new(Some(0), None, None).unwrap();
        assert_eq!(page.limit, None);
        assert!(!page.desc);

        let page = Page::<i64>::new(None, Some(5), Some(true)).unwrap();
        assert_eq!(page.limit, None);
        assert_eq!(page.since, Some(5));
        assert!(page.desc);
    }

    #[test]
    fn negative_limit_is_a_bad_request() {
        let err = Page::<i64>::new(Some(-3), None, None).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn default_limit_only_fills_missing_values() {
        let page = Page::<String>::new(None, None, None).unwrap().with_default_limit(100);
        assert_eq!(page.limit, Some(100));

        let page = Page::<String>::new(Some(3), None, None).unwrap().with_default_limit(100);
        assert_eq!(page.limit, Some(3));
    }
}
