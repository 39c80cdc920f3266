use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::json;

use crate::domain::{Toggle, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, EventSink, FollowRepository, UserRepository};

/// Answers "who does this user follow" and flips follow edges.
pub struct SocialGraph {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
    events: Arc<dyn EventSink>,
}

impl SocialGraph {
    pub fn new(
        users: Arc<dyn UserRepository>,
        follows: Arc<dyn FollowRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            users,
            follows,
            events,
        }
    }

    async fn require_user(&self, id: i32) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Ids of the users `user_id` follows.
    pub async fn followed_ids(&self, user_id: i32) -> Result<Vec<i32>, DomainError> {
        self.require_user(user_id).await?;
        Ok(self.follows.followed_ids(user_id).await?)
    }

    /// The followed set plus the user itself: everyone whose posts belong
    /// in this user's feed.
    pub async fn feed_authors(&self, user_id: i32) -> Result<BTreeSet<i32>, DomainError> {
        let mut authors: BTreeSet<i32> = self.followed_ids(user_id).await?.into_iter().collect();
        authors.insert(user_id);
        Ok(authors)
    }

    pub async fn is_following(&self, follower_id: i32, followed_id: i32) -> Result<bool, DomainError> {
        Ok(self.follows.exists(follower_id, followed_id).await?)
    }

    /// Follow `target_id` if `actor_id` does not yet, otherwise unfollow.
    ///
    /// Returns the outcome and the target user.
    pub async fn toggle_follow(
        &self,
        actor_id: i32,
        target_id: i32,
    ) -> Result<(Toggle, User), DomainError> {
        let target = self.require_user(target_id).await?;
        if actor_id == target_id {
            return Err(DomainError::Validation(
                "You cannot follow yourself".to_string(),
            ));
        }

        let outcome = if self.follows.exists(actor_id, target_id).await? {
            self.follows.delete(actor_id, target_id).await?;
            Toggle::Removed
        } else {
            self.follows.create(actor_id, target_id).await?;
            Toggle::Added
        };

        self.record_follow(actor_id, target_id, outcome);
        Ok((outcome, target))
    }

    /// Remove the edge if present. Returns whether an edge was removed.
    pub async fn unfollow(&self, actor_id: i32, target_id: i32) -> Result<(bool, User), DomainError> {
        let target = self.require_user(target_id).await?;

        let removed = match self.follows.delete(actor_id, target_id).await {
            Ok(removed) => removed,
            Err(RepoError::NotFound) => false,
            Err(e) => return Err(e.into()),
        };

        if removed {
            self.record_follow(actor_id, target_id, Toggle::Removed);
        }
        Ok((removed, target))
    }

    /// Up to `limit` users that `user_id` follows, by username.
    pub async fn following(&self, user_id: i32, limit: usize) -> Result<Vec<User>, DomainError> {
        let ids = self.followed_ids(user_id).await?;
        let mut users = self.users.find_by_ids(&ids).await?;
        users.truncate(limit);
        Ok(users)
    }

    /// Up to `limit` users that are neither `user_id` nor followed by it.
    pub async fn suggestions(&self, user_id: i32, limit: u64) -> Result<Vec<User>, DomainError> {
        let exclude: Vec<i32> = self.feed_authors(user_id).await?.into_iter().collect();
        Ok(self.users.find_excluding(&exclude, limit).await?)
    }

    fn record_follow(&self, follower_id: i32, followed_id: i32, outcome: Toggle) {
        let action = if outcome.is_added() { "follow" } else { "unfollow" };
        self.events.audit(
            action,
            json!({
                "resource_type": "follow_relationship",
                "resource_id": format!("{follower_id}_{followed_id}"),
                "user_id": follower_id,
                "followed_user_id": followed_id,
            }),
        );
        self.events.business(
            if outcome.is_added() { "user_followed" } else { "user_unfollowed" },
            json!({
                "follower_id": follower_id,
                "followed_id": followed_id,
            }),
        );
    }
}
