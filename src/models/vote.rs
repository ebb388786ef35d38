// src/models/vote.rs

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// DTO for voting on a thread. One vote per (nickname, thread); re-voting
/// replaces the previous voice.
#[derive(Debug, Deserialize, Validate)]
pub struct VoteRequest {
    #[validate(length(min = 1, message = "nickname must not be empty"))]
    pub nickname: String,

    #[validate(custom(function = "validate_voice"))]
    pub voice: i32,
}

fn validate_voice(voice: i32) -> Result<(), ValidationError> {
    if matches!(voice, 1 | -1) {
        Ok(())
    } else {
        Err(ValidationError::new("voice").with_message("voice must be 1 or -1".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(voice: i32) -> VoteRequest {
        VoteRequest {
            nickname: "jack".to_string(),
            voice,
        }
    }

    #[test]
    fn only_unit_voices_are_valid() {
        assert!(vote(1).validate().is_ok());
        assert!(vote(-1).validate().is_ok());
        assert!(vote(0).validate().is_err());
        assert!(vote(2).validate().is_err());
    }
}
