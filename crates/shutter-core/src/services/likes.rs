use std::sync::Arc;

use serde_json::json;

use crate::domain::Toggle;
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, EventSink, LikeRepository, PostRepository};

/// Like toggling. Gated only by authentication.
pub struct LikeService {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
    events: Arc<dyn EventSink>,
}

impl LikeService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        likes: Arc<dyn LikeRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            posts,
            likes,
            events,
        }
    }

    /// Remove the actor's like on the post if present, otherwise add one.
    pub async fn toggle(&self, actor_id: i32, post_id: i32) -> Result<Toggle, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }

        let outcome = match self.likes.find_by_user_and_post(actor_id, post_id).await? {
            Some(like) => match self.likes.delete(like.id).await {
                // A concurrent toggle already removed it.
                Ok(()) | Err(RepoError::NotFound) => Toggle::Removed,
                Err(e) => return Err(e.into()),
            },
            None => {
                self.likes.create(actor_id, post_id).await?;
                Toggle::Added
            }
        };

        let action = if outcome.is_added() { "like" } else { "unlike" };
        self.events.audit(
            action,
            json!({
                "resource_type": "like",
                "resource_id": format!("{actor_id}_{post_id}"),
                "user_id": actor_id,
                "post_id": post_id,
            }),
        );
        self.events.business(
            if outcome.is_added() { "post_liked" } else { "post_unliked" },
            json!({
                "post_id": post_id,
                "user_id": actor_id,
                "engagement_type": "like",
            }),
        );

        Ok(outcome)
    }
}
