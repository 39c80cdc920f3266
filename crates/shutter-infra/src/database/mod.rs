//! Database connection management and SeaORM repositories.

mod base;
mod connections;
pub mod entity;
mod repositories;

use std::sync::Arc;

use sea_orm::DbConn;
use shutter_core::ports::{
    CommentRepository, FollowRepository, LikeRepository, PostRepository, UserRepository,
};

pub use base::SeaOrmBaseRepository;
pub use connections::{DatabaseConfig, connect};
pub use repositories::{
    SeaOrmCommentRepository, SeaOrmFollowRepository, SeaOrmLikeRepository, SeaOrmPostRepository,
    SeaOrmUserRepository,
};

/// Every repository, sharing one connection pool.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    pub fn new(db: DbConn) -> Self {
        Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            posts: Arc::new(SeaOrmPostRepository::new(db.clone())),
            comments: Arc::new(SeaOrmCommentRepository::new(db.clone())),
            likes: Arc::new(SeaOrmLikeRepository::new(db.clone())),
            follows: Arc::new(SeaOrmFollowRepository::new(db)),
        }
    }
}

#[cfg(test)]
mod tests;
