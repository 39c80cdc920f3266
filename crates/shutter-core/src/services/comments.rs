use std::sync::Arc;

use serde_json::json;

use crate::domain::{Comment, NewComment, normalize_comment};
use crate::error::DomainError;
use crate::ports::{BaseRepository, CommentRepository, EventSink, PostRepository};

use super::ensure_owner;

/// Comment mutations. Anyone signed in may comment; edits and deletes are
/// author-only.
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    events: Arc<dyn EventSink>,
}

impl CommentService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            posts,
            comments,
            events,
        }
    }

    async fn find(&self, comment_id: i32) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }

    pub async fn create(
        &self,
        actor_id: i32,
        post_id: i32,
        text: &str,
    ) -> Result<Comment, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }

        let text = normalize_comment(text)?;
        let comment = self
            .comments
            .create(NewComment::new(actor_id, post_id, text))
            .await?;

        let text_length = comment.text.chars().count();
        self.events.audit(
            "create",
            json!({
                "resource_type": "comment",
                "resource_id": comment.id,
                "user_id": actor_id,
                "post_id": post_id,
                "text_length": text_length,
            }),
        );
        self.events.business(
            "comment_created",
            json!({
                "comment_id": comment.id,
                "post_id": post_id,
                "user_id": actor_id,
                "text_length": text_length,
            }),
        );

        Ok(comment)
    }

    pub async fn get_owned(&self, actor_id: i32, comment_id: i32) -> Result<Comment, DomainError> {
        let comment = self.find(comment_id).await?;
        ensure_owner(
            &*self.events,
            actor_id,
            comment.user_id,
            "comment",
            comment_id,
            "edit_comment",
        )?;
        Ok(comment)
    }

    pub async fn edit(
        &self,
        actor_id: i32,
        comment_id: i32,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let comment = self.get_owned(actor_id, comment_id).await?;

        let text = normalize_comment(text)?;
        let changed = comment.text != text;
        let updated = self.comments.update_text(comment_id, text).await?;

        self.events.audit(
            "update",
            json!({
                "resource_type": "comment",
                "resource_id": comment_id,
                "user_id": actor_id,
                "old_text_length": comment.text.chars().count(),
                "new_text_length": updated.text.chars().count(),
            }),
        );
        self.events.business(
            "comment_edited",
            json!({
                "comment_id": comment_id,
                "user_id": actor_id,
                "text_changed": changed,
            }),
        );

        Ok(updated)
    }

    /// Delete a comment; returns the id of the post it was on.
    pub async fn delete(&self, actor_id: i32, comment_id: i32) -> Result<i32, DomainError> {
        let comment = self.find(comment_id).await?;
        ensure_owner(
            &*self.events,
            actor_id,
            comment.user_id,
            "comment",
            comment_id,
            "delete_comment",
        )?;

        self.comments.delete(comment_id).await?;

        self.events.audit(
            "delete",
            json!({
                "resource_type": "comment",
                "resource_id": comment_id,
                "user_id": actor_id,
                "post_id": comment.post_id,
            }),
        );
        self.events.business(
            "comment_deleted",
            json!({
                "comment_id": comment_id,
                "post_id": comment.post_id,
                "user_id": actor_id,
            }),
        );

        Ok(comment.post_id)
    }
}
