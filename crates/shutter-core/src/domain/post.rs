use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Post entity - a captioned entry on an author's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub caption: String,
    pub timestamp: DateTime<Utc>,
}

/// A post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i32,
    pub caption: String,
    pub timestamp: DateTime<Utc>,
}

impl NewPost {
    /// Create a new post timestamped now.
    pub fn new(user_id: i32, caption: String) -> Self {
        Self {
            user_id,
            caption,
            timestamp: Utc::now(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Trim a caption and reject blank input.
pub fn normalize_caption(raw: &str) -> Result<String, DomainError> {
    let caption = raw.trim();
    if caption.is_empty() {
        return Err(DomainError::Validation("Caption cannot be empty".to_string()));
    }
    Ok(caption.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_caption_is_rejected() {
        assert!(normalize_caption("   \n\t").is_err());
        assert!(normalize_caption("").is_err());
    }

    #[test]
    fn test_caption_is_trimmed() {
        assert_eq!(normalize_caption("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn test_long_caption_is_kept_whole() {
        let long = "x".repeat(5000);
        assert_eq!(normalize_caption(&long).unwrap().len(), 5000);
    }
}
