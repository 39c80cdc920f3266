//! Application state - shared across all handlers.

use std::sync::Arc;

use sea_orm::DbConn;
use shutter_core::ports::{EventSink, PasswordService, TokenService};
use shutter_core::services::{
    AccountService, CommentService, FeedService, LikeService, PostService, SocialGraph,
};
use shutter_infra::{Argon2PasswordService, JwtConfig, JwtTokenService, Repositories, TracingEventSink};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub tokens: Arc<dyn TokenService>,
    pub accounts: Arc<AccountService>,
    pub graph: Arc<SocialGraph>,
    pub feed: Arc<FeedService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub likes: Arc<LikeService>,
}

impl AppState {
    /// Wire repositories, services and the session token service together.
    pub fn new(db: DbConn, session: JwtConfig) -> Self {
        let repos = Repositories::new(db.clone());
        let events: Arc<dyn EventSink> = Arc::new(TracingEventSink::new());
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(session));

        let graph = Arc::new(SocialGraph::new(
            repos.users.clone(),
            repos.follows.clone(),
            events.clone(),
        ));
        let feed = Arc::new(FeedService::new(
            graph.clone(),
            repos.users.clone(),
            repos.posts.clone(),
            repos.comments.clone(),
            repos.likes.clone(),
            events.clone(),
        ));

        tracing::info!("Application state initialized");

        Self {
            accounts: Arc::new(AccountService::new(
                repos.users.clone(),
                passwords,
                events.clone(),
            )),
            posts: Arc::new(PostService::new(
                repos.posts.clone(),
                repos.comments.clone(),
                repos.likes.clone(),
                events.clone(),
            )),
            comments: Arc::new(CommentService::new(
                repos.posts.clone(),
                repos.comments.clone(),
                events.clone(),
            )),
            likes: Arc::new(LikeService::new(repos.posts, repos.likes, events)),
            graph,
            feed,
            tokens,
            db,
        }
    }
}
