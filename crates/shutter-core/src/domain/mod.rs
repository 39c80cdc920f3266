//! Domain entities - the core business objects.

mod comment;
mod feed;
mod post;
mod social;
mod user;

pub use comment::{Comment, NewComment, normalize_comment};
pub use feed::{CommentView, FeedItem, HomeView};
pub use post::{NewPost, Post, normalize_caption};
pub use social::{Like, Toggle};
pub use user::{NewUser, USERNAME_MAX_LEN, User, normalize_username};
