//! Application services - the feed assembler, the social graph, and the
//! mutation handlers. Each service talks to storage only through ports.

mod accounts;
mod comments;
mod feed;
mod likes;
mod posts;
mod social_graph;

pub use accounts::AccountService;
pub use comments::CommentService;
pub use feed::FeedService;
pub use likes::LikeService;
pub use posts::PostService;
pub use social_graph::SocialGraph;

use serde_json::json;

use crate::error::DomainError;
use crate::ports::EventSink;

/// Reject the action unless `actor` owns the resource.
///
/// A rejection is recorded as a security event before the error is returned.
pub(crate) fn ensure_owner(
    events: &dyn EventSink,
    actor: i32,
    owner: i32,
    entity_type: &'static str,
    id: i32,
    action: &str,
) -> Result<(), DomainError> {
    if actor == owner {
        return Ok(());
    }

    events.security(
        "unauthorized_access",
        json!({
            "resource_type": entity_type,
            "resource_id": id,
            "user_id": actor,
            "owner_id": owner,
            "attempted_action": action,
        }),
    );

    Err(DomainError::Forbidden { entity_type, id })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use crate::ports::{EventCategory, EventSink};

    /// Captures events so tests can assert on them.
    #[derive(Default)]
    pub struct RecordingSink {
        pub events: Mutex<Vec<(EventCategory, String, serde_json::Value)>>,
    }

    impl RecordingSink {
        pub fn names(&self, category: EventCategory) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|(c, _, _)| *c == category)
                .map(|(_, name, _)| name.clone())
                .collect()
        }
    }

    impl EventSink for RecordingSink {
        fn record(&self, category: EventCategory, event: &str, fields: serde_json::Value) {
            self.events
                .lock()
                .unwrap()
                .push((category, event.to_string(), fields));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSink;
    use super::*;
    use crate::ports::EventCategory;

    #[test]
    fn test_owner_passes_without_events() {
        let sink = RecordingSink::default();
        assert!(ensure_owner(&sink, 7, 7, "post", 1, "edit_post").is_ok());
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_non_owner_is_forbidden_and_logged() {
        let sink = RecordingSink::default();
        let result = ensure_owner(&sink, 7, 8, "post", 1, "delete_post");

        assert!(matches!(
            result,
            Err(DomainError::Forbidden {
                entity_type: "post",
                id: 1
            })
        ));
        assert_eq!(
            sink.names(EventCategory::Security),
            vec!["unauthorized_access".to_string()]
        );
        let events = sink.events.lock().unwrap();
        assert_eq!(events[0].2["owner_id"], 8);
        assert_eq!(events[0].2["attempted_action"], "delete_post");
    }
}
