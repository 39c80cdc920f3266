//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod events;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use events::{EventCategory, EventSink, NoopEventSink};
pub use repository::{
    BaseRepository, CommentRepository, FollowRepository, LikeRepository, PostRepository,
    UserRepository,
};
