use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use serde_json::json;

use crate::domain::{CommentView, FeedItem, HomeView};
use crate::error::DomainError;
use crate::ports::{CommentRepository, EventSink, LikeRepository, PostRepository, UserRepository};

use super::SocialGraph;

const FOLLOWING_STRIP_LEN: usize = 6;
const SUGGESTION_COUNT: u64 = 5;

/// Builds the home feed: own posts plus posts of followed users, newest
/// first, each annotated with whether the requester liked it.
pub struct FeedService {
    graph: Arc<SocialGraph>,
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
    events: Arc<dyn EventSink>,
}

impl FeedService {
    pub fn new(
        graph: Arc<SocialGraph>,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            graph,
            users,
            posts,
            comments,
            likes,
            events,
        }
    }

    pub async fn home_feed(&self, user_id: i32) -> Result<Vec<FeedItem>, DomainError> {
        let started = Instant::now();

        let authors: Vec<i32> = self.graph.feed_authors(user_id).await?.into_iter().collect();
        let posts = self.posts.find_by_authors(&authors).await?;
        if posts.is_empty() {
            self.record_timing(user_id, 0, started);
            return Ok(Vec::new());
        }

        let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        let liked = self.likes.liked_post_ids(user_id, &post_ids).await?;
        let like_counts = self.likes.count_by_posts(&post_ids).await?;
        let comments = self.comments.find_by_posts(&post_ids).await?;

        let mut named: BTreeSet<i32> = posts.iter().map(|p| p.user_id).collect();
        named.extend(comments.iter().map(|c| c.user_id));
        let named: Vec<i32> = named.into_iter().collect();
        let usernames: HashMap<i32, String> = self
            .users
            .find_by_ids(&named)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let name_of = |id: i32| {
            usernames
                .get(&id)
                .cloned()
                .unwrap_or_else(|| "[deleted]".to_string())
        };

        let mut comments_by_post: HashMap<i32, Vec<CommentView>> = HashMap::new();
        for comment in comments {
            let author = name_of(comment.user_id);
            comments_by_post
                .entry(comment.post_id)
                .or_default()
                .push(CommentView { comment, author });
        }

        let feed: Vec<FeedItem> = posts
            .into_iter()
            .map(|post| FeedItem {
                author: name_of(post.user_id),
                liked: liked.contains(&post.id),
                like_count: like_counts.get(&post.id).copied().unwrap_or(0),
                comments: comments_by_post.remove(&post.id).unwrap_or_default(),
                post,
            })
            .collect();

        self.record_timing(user_id, feed.len(), started);
        Ok(feed)
    }

    /// Feed plus the "following" strip and follow suggestions.
    pub async fn home(&self, user_id: i32) -> Result<HomeView, DomainError> {
        let feed = self.home_feed(user_id).await?;
        let following = self.graph.following(user_id, FOLLOWING_STRIP_LEN).await?;
        let suggestions = self.graph.suggestions(user_id, SUGGESTION_COUNT).await?;

        Ok(HomeView {
            feed,
            following,
            suggestions,
        })
    }

    fn record_timing(&self, user_id: i32, post_count: usize, started: Instant) {
        let duration_ms = (started.elapsed().as_secs_f64() * 100_000.0).round() / 100.0;
        self.events.performance(
            "feed_assembled",
            json!({
                "user_id": user_id,
                "post_count": post_count,
                "duration_ms": duration_ms,
            }),
        );
    }
}
