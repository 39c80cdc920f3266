use std::sync::Arc;

use serde_json::json;

use crate::domain::{NewPost, Post, normalize_caption};
use crate::error::DomainError;
use crate::ports::{BaseRepository, CommentRepository, EventSink, LikeRepository, PostRepository};

use super::ensure_owner;

/// Create, edit and delete posts. Edits and deletes are author-only.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
    events: Arc<dyn EventSink>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            posts,
            comments,
            likes,
            events,
        }
    }

    pub async fn find(&self, post_id: i32) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    pub async fn create(&self, actor_id: i32, caption: &str) -> Result<Post, DomainError> {
        let caption = normalize_caption(caption)?;
        let post = self.posts.create(NewPost::new(actor_id, caption)).await?;

        let caption_length = post.caption.chars().count();
        self.events.audit(
            "create",
            json!({
                "resource_type": "post",
                "resource_id": post.id,
                "user_id": actor_id,
                "caption_length": caption_length,
            }),
        );
        self.events.business(
            "post_created",
            json!({
                "post_id": post.id,
                "user_id": actor_id,
                "caption_length": caption_length,
            }),
        );

        Ok(post)
    }

    /// Load a post for editing; only its author may.
    pub async fn get_owned(&self, actor_id: i32, post_id: i32) -> Result<Post, DomainError> {
        let post = self.find(post_id).await?;
        ensure_owner(&*self.events, actor_id, post.user_id, "post", post_id, "edit_post")?;
        Ok(post)
    }

    pub async fn edit(&self, actor_id: i32, post_id: i32, caption: &str) -> Result<Post, DomainError> {
        let post = self.find(post_id).await?;
        ensure_owner(&*self.events, actor_id, post.user_id, "post", post_id, "edit_post")?;

        let caption = normalize_caption(caption)?;
        let old_length = post.caption.chars().count();
        let changed = post.caption != caption;
        let updated = self.posts.update_caption(post_id, caption).await?;

        self.events.audit(
            "update",
            json!({
                "resource_type": "post",
                "resource_id": post_id,
                "user_id": actor_id,
                "old_caption_length": old_length,
                "new_caption_length": updated.caption.chars().count(),
            }),
        );
        self.events.business(
            "post_edited",
            json!({
                "post_id": post_id,
                "user_id": actor_id,
                "caption_changed": changed,
            }),
        );

        Ok(updated)
    }

    /// Delete a post with all of its comments and likes.
    pub async fn delete(&self, actor_id: i32, post_id: i32) -> Result<(), DomainError> {
        let post = self.find(post_id).await?;
        ensure_owner(&*self.events, actor_id, post.user_id, "post", post_id, "delete_post")?;

        let likes_count = self
            .likes
            .count_by_posts(&[post_id])
            .await?
            .get(&post_id)
            .copied()
            .unwrap_or(0);
        let comments_count = self.comments.count_by_post(post_id).await?;

        self.posts.delete_with_dependents(post_id).await?;

        self.events.audit(
            "delete",
            json!({
                "resource_type": "post",
                "resource_id": post_id,
                "user_id": actor_id,
                "likes_count": likes_count,
                "comments_count": comments_count,
            }),
        );
        self.events.business(
            "post_deleted",
            json!({
                "post_id": post_id,
                "user_id": actor_id,
                "engagement_lost": { "likes": likes_count, "comments": comments_count },
            }),
        );

        Ok(())
    }
}
