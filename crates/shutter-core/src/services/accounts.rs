use std::sync::Arc;

use serde_json::json;

use crate::domain::{NewUser, User, normalize_username};
use crate::error::DomainError;
use crate::ports::{BaseRepository, EventSink, PasswordService, UserRepository};

/// Registration, credential checks and session bookkeeping.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    events: Arc<dyn EventSink>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            users,
            passwords,
            events,
        }
    }

    pub async fn find(&self, user_id: i32) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_id(user_id).await?)
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, DomainError> {
        if username.trim().is_empty() || password.is_empty() || confirm_password.is_empty() {
            return Err(DomainError::Validation("All fields are required".to_string()));
        }
        if password != confirm_password {
            return Err(DomainError::Validation("Passwords do not match".to_string()));
        }

        let username = normalize_username(username)?;
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Duplicate("Username already exists".to_string()));
        }

        let password_hash = self.passwords.hash(password)?;
        let user = self
            .users
            .create(NewUser::new(username, password_hash))
            .await?;

        self.events.audit(
            "create",
            json!({
                "resource_type": "user",
                "resource_id": user.id,
                "username": user.username,
            }),
        );
        self.events.business(
            "user_registered",
            json!({ "user_id": user.id, "username": user.username }),
        );

        Ok(user)
    }

    /// Check credentials. Unknown users and wrong passwords fail the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Username and password required".to_string(),
            ));
        }

        let Some(user) = self.users.find_by_username(username).await? else {
            self.failed_login(username, "unknown_user");
            return Err(DomainError::Unauthorized);
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            self.failed_login(username, "bad_password");
            return Err(DomainError::Unauthorized);
        }

        self.events.audit(
            "login",
            json!({
                "resource_type": "user_session",
                "user_id": user.id,
                "username": user.username,
            }),
        );
        Ok(user)
    }

    pub fn logout(&self, user_id: i32, username: &str) {
        self.events.audit(
            "logout",
            json!({
                "resource_type": "user_session",
                "user_id": user_id,
                "username": username,
            }),
        );
    }

    /// A session token named a user that no longer exists.
    pub fn invalid_session(&self, user_id: i32) {
        self.events.security(
            "invalid_session",
            json!({ "user_id": user_id, "reason": "user_not_found" }),
        );
    }

    fn failed_login(&self, username: &str, reason: &str) {
        self.events.security(
            "failed_login",
            json!({ "username": username, "failure_reason": reason }),
        );
    }
}
