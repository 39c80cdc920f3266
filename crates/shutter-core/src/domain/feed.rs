use serde::Serialize;

use super::{Comment, Post, User};

/// A comment together with its author's name.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author: String,
}

/// One entry of a home feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub post: Post,
    pub author: String,
    /// Whether the requesting user has liked this post.
    pub liked: bool,
    pub like_count: usize,
    /// Oldest first.
    pub comments: Vec<CommentView>,
}

/// Everything the home page shows.
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub feed: Vec<FeedItem>,
    pub following: Vec<User>,
    pub suggestions: Vec<User>,
}
