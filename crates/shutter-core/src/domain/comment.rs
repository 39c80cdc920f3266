use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Comment entity - text left by a user on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub user_id: i32,
    pub post_id: i32,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: i32,
    pub post_id: i32,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl NewComment {
    pub fn new(user_id: i32, post_id: i32, text: String) -> Self {
        Self {
            user_id,
            post_id,
            text,
            timestamp: Utc::now(),
        }
    }
}

/// Trim comment text and reject blank input.
pub fn normalize_comment(raw: &str) -> Result<String, DomainError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(DomainError::Validation("Comment cannot be empty".to_string()));
    }
    Ok(text.to_string())
}
