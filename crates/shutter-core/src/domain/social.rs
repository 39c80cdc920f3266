use serde::{Deserialize, Serialize};

/// A user's like on a post. At most one per (user, post).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: i32,
    pub user_id: i32,
    pub post_id: i32,
}

/// Outcome of a toggle on a like or a follow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

impl Toggle {
    pub fn is_added(self) -> bool {
        matches!(self, Toggle::Added)
    }
}
