use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::domain::{Comment, Like, NewComment, NewPost, NewUser, Post, User};
use crate::error::RepoError;

/// Generic repository trait for entities keyed by a single id.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Users with the given ids, ordered by username.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<User>, RepoError>;

    /// Up to `limit` users whose id is not in `exclude`, ordered by id.
    async fn find_excluding(&self, exclude: &[i32], limit: u64) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn update_caption(&self, id: i32, caption: String) -> Result<Post, RepoError>;

    /// Posts written by any of `author_ids`, newest first; equal timestamps
    /// keep insertion order.
    async fn find_by_authors(&self, author_ids: &[i32]) -> Result<Vec<Post>, RepoError>;

    /// Delete the post together with its comments and likes, atomically.
    async fn delete_with_dependents(&self, id: i32) -> Result<(), RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    async fn update_text(&self, id: i32, text: String) -> Result<Comment, RepoError>;

    /// Comments on any of `post_ids`, oldest first.
    async fn find_by_posts(&self, post_ids: &[i32]) -> Result<Vec<Comment>, RepoError>;

    async fn count_by_post(&self, post_id: i32) -> Result<u64, RepoError>;
}

/// Like repository.
#[async_trait]
pub trait LikeRepository: BaseRepository<Like, i32> {
    async fn find_by_user_and_post(
        &self,
        user_id: i32,
        post_id: i32,
    ) -> Result<Option<Like>, RepoError>;

    /// Insert a like. A second like for the same pair is a `Constraint` error.
    async fn create(&self, user_id: i32, post_id: i32) -> Result<Like, RepoError>;

    /// Which of `post_ids` the user has liked.
    async fn liked_post_ids(
        &self,
        user_id: i32,
        post_ids: &[i32],
    ) -> Result<HashSet<i32>, RepoError>;

    /// Like counts keyed by post id; posts without likes are absent.
    async fn count_by_posts(&self, post_ids: &[i32]) -> Result<HashMap<i32, usize>, RepoError>;
}

/// Follow-edge repository. Edges are keyed by the (follower, followed) pair.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, follower_id: i32, followed_id: i32) -> Result<bool, RepoError>;

    /// Insert an edge. An existing edge is a `Constraint` error.
    async fn create(&self, follower_id: i32, followed_id: i32) -> Result<(), RepoError>;

    /// Remove an edge; returns whether one was removed.
    async fn delete(&self, follower_id: i32, followed_id: i32) -> Result<bool, RepoError>;

    /// Ids of the users `follower_id` follows.
    async fn followed_ids(&self, follower_id: i32) -> Result<Vec<i32>, RepoError>;
}
