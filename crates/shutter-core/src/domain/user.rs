use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const USERNAME_MAX_LEN: usize = 80;

/// User entity - represents an account in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A user that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Create a new user stamped with the current time.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Trim a username. It must be non-empty and fit the `users.username` column.
pub fn normalize_username(raw: &str) -> Result<String, DomainError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(DomainError::Validation("Username is required".to_string()));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "Username cannot be longer than {USERNAME_MAX_LEN} characters"
        )));
    }
    Ok(username.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_trimmed() {
        assert_eq!(normalize_username("  jane_doe ").unwrap(), "jane_doe");
    }

    #[test]
    fn test_short_and_unicode_usernames_are_accepted() {
        assert_eq!(normalize_username("al").unwrap(), "al");
        assert_eq!(normalize_username("josé").unwrap(), "josé");
        assert_eq!(normalize_username("jane doe").unwrap(), "jane doe");
    }

    #[test]
    fn test_username_rejects_blank_and_overlong() {
        assert!(matches!(
            normalize_username("   "),
            Err(DomainError::Validation(_))
        ));
        assert!(normalize_username(&"é".repeat(USERNAME_MAX_LEN)).is_ok());
        assert!(matches!(
            normalize_username(&"a".repeat(USERNAME_MAX_LEN + 1)),
            Err(DomainError::Validation(_))
        ));
    }
}
