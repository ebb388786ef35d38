// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    /// Unique, case-insensitive handle. Stored in the case it was registered with.
    pub nickname: String,
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    /// Unique, case-insensitive.
    pub email: String,
}

/// DTO for creating a user. The nickname comes from the path.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "fullname must not be empty"))]
    pub fullname: String,

    #[serde(default)]
    pub about: String,

    #[validate(email(message = "email is not valid"))]
    pub email: String,
}

/// DTO for a partial profile update. Missing or empty fields keep their value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub fullname: Option<String>,
    pub about: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Turns empty strings into `None` so they keep the stored value and
    /// skip validation.
    pub fn without_empty(self) -> Self {
        let keep = |field: Option<String>| field.filter(|value| !value.is_empty());
        Self {
            fullname: keep(self.fullname),
            about: keep(self.about),
            email: keep(self.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_rejects_bad_email() {
        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "fullname": "Captain Jack Sparrow",
            "email": "not-an-email"
        }))
        .unwrap();
        assert!(req.validate().is_err());
        assert_eq!(req.about, "");
    }

    #[test]
    fn update_request_allows_empty_body() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
        assert!(req.email.is_none());
    }

    #[test]
    fn empty_update_fields_are_dropped_before_validation() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"email": "", "about": "Savvy?", "fullname": ""}"#).unwrap();
        assert!(req.validate().is_err());

        let req = req.without_empty();
        assert!(req.validate().is_ok());
        assert!(req.email.is_none());
        assert!(req.fullname.is_none());
        assert_eq!(req.about.as_deref(), Some("Savvy?"));
    }
}
