use std::sync::Arc;

use chrono::{TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DbConn, EntityTrait, PaginatorTrait};

use shutter_core::domain::{FeedItem, NewComment, NewPost, NewUser, Post, Toggle, User};
use shutter_core::error::RepoError;
use shutter_core::ports::{BaseRepository, EventSink, NoopEventSink};
use shutter_core::services::{
    AccountService, CommentService, FeedService, LikeService, PostService, SocialGraph,
};
use shutter_core::DomainError;

use super::entity::{comment, like, post};
use super::{DatabaseConfig, Repositories, SeaOrmPostRepository, connect};
use crate::auth::Argon2PasswordService;

async fn setup() -> (DbConn, Repositories) {
    let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let repos = Repositories::new(db.clone());
    (db, repos)
}

async fn user(repos: &Repositories, name: &str) -> User {
    repos
        .users
        .create(NewUser::new(name.to_string(), "not-a-real-hash".to_string()))
        .await
        .unwrap()
}

async fn post_at(repos: &Repositories, author: i32, caption: &str, secs: i64) -> Post {
    let ts = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
    repos
        .posts
        .create(NewPost::new(author, caption.to_string()).at(ts))
        .await
        .unwrap()
}

struct Services {
    graph: Arc<SocialGraph>,
    feed: FeedService,
    posts: PostService,
    comments: CommentService,
    likes: LikeService,
}

fn services(repos: &Repositories) -> Services {
    let events: Arc<dyn EventSink> = Arc::new(NoopEventSink);
    let graph = Arc::new(SocialGraph::new(
        repos.users.clone(),
        repos.follows.clone(),
        events.clone(),
    ));

    Services {
        feed: FeedService::new(
            graph.clone(),
            repos.users.clone(),
            repos.posts.clone(),
            repos.comments.clone(),
            repos.likes.clone(),
            events.clone(),
        ),
        posts: PostService::new(
            repos.posts.clone(),
            repos.comments.clone(),
            repos.likes.clone(),
            events.clone(),
        ),
        comments: CommentService::new(repos.posts.clone(), repos.comments.clone(), events.clone()),
        likes: LikeService::new(repos.posts.clone(), repos.likes.clone(), events),
        graph,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let (db, repos) = setup().await;
    let alice = user(&repos, "alice").await;
    let stored = post_at(&repos, alice.id, "Sunset", 0).await;

    let repo = SeaOrmPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(stored.id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.caption, "Sunset");
    assert_eq!(post.user_id, alice.id);
    let missing: Option<Post> = repo.find_by_id(stored.id + 1).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_posts_newest_first_ties_in_insertion_order() {
    let (_db, repos) = setup().await;
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;

    let old = post_at(&repos, alice.id, "old", 0).await;
    let tie_a = post_at(&repos, bob.id, "tie a", 60).await;
    let tie_b = post_at(&repos, alice.id, "tie b", 60).await;
    let newest = post_at(&repos, bob.id, "newest", 120).await;

    let ids: Vec<i32> = repos
        .posts
        .find_by_authors(&[alice.id, bob.id])
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();

    assert_eq!(ids, vec![newest.id, tie_a.id, tie_b.id, old.id]);
    assert!(repos.posts.find_by_authors(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_like_is_a_constraint_error() {
    let (_db, repos) = setup().await;
    let alice = user(&repos, "alice").await;
    let post = post_at(&repos, alice.id, "hello", 0).await;

    repos.likes.create(alice.id, post.id).await.unwrap();
    let second = repos.likes.create(alice.id, post.id).await;

    assert!(matches!(second, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn test_like_counts_are_grouped_per_post() {
    let (_db, repos) = setup().await;
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;
    let carol = user(&repos, "carol").await;
    let popular = post_at(&repos, alice.id, "popular", 0).await;
    let quiet = post_at(&repos, alice.id, "quiet", 10).await;
    let ignored = post_at(&repos, alice.id, "ignored", 20).await;

    for liker in [&alice, &bob, &carol] {
        repos.likes.create(liker.id, popular.id).await.unwrap();
    }
    repos.likes.create(bob.id, quiet.id).await.unwrap();
    repos.likes.create(bob.id, ignored.id).await.unwrap();

    let counts = repos
        .likes
        .count_by_posts(&[popular.id, quiet.id])
        .await
        .unwrap();

    assert_eq!(counts.len(), 2);
    assert_eq!(counts[&popular.id], 3);
    assert_eq!(counts[&quiet.id], 1);
}

#[tokio::test]
async fn test_duplicate_follow_is_a_constraint_error() {
    let (_db, repos) = setup().await;
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;

    repos.follows.create(alice.id, bob.id).await.unwrap();
    let second = repos.follows.create(alice.id, bob.id).await;

    assert!(matches!(second, Err(RepoError::Constraint(_))));
    assert!(repos.follows.exists(alice.id, bob.id).await.unwrap());
    assert!(!repos.follows.exists(bob.id, alice.id).await.unwrap());
}

#[tokio::test]
async fn test_schema_rejects_self_follow() {
    let (_db, repos) = setup().await;
    let alice = user(&repos, "alice").await;

    assert!(repos.follows.create(alice.id, alice.id).await.is_err());
    assert!(repos.follows.followed_ids(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_with_dependents_leaves_no_orphans() {
    let (db, repos) = setup().await;
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;
    let doomed = post_at(&repos, alice.id, "doomed", 0).await;
    let kept = post_at(&repos, alice.id, "kept", 10).await;

    for p in [&doomed, &kept] {
        repos.likes.create(bob.id, p.id).await.unwrap();
        repos
            .comments
            .create(NewComment::new(bob.id, p.id, "nice".to_string()))
            .await
            .unwrap();
    }

    repos.posts.delete_with_dependents(doomed.id).await.unwrap();

    assert!(repos.posts.find_by_id(doomed.id).await.unwrap().is_none());
    assert_eq!(like::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(comment::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(repos.comments.count_by_post(kept.id).await.unwrap(), 1);

    let again = repos.posts.delete_with_dependents(doomed.id).await;
    assert!(matches!(again, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_user_listing_queries() {
    let (_db, repos) = setup().await;
    let carol = user(&repos, "carol").await;
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;

    let names: Vec<String> = repos
        .users
        .find_by_ids(&[carol.id, bob.id, alice.id])
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);

    let others: Vec<i32> = repos
        .users
        .find_excluding(&[alice.id], 5)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(others, vec![carol.id, bob.id]);

    assert_eq!(repos.users.find_excluding(&[], 2).await.unwrap().len(), 2);
    assert!(
        repos
            .users
            .find_by_username("alice")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_feed_is_own_and_followed_posts_newest_first() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;
    let carol = user(&repos, "carol").await;

    let a1 = post_at(&repos, alice.id, "a1", 0).await;
    let b1 = post_at(&repos, bob.id, "b1", 30).await;
    post_at(&repos, carol.id, "c1", 60).await;

    let (outcome, _) = svc.graph.toggle_follow(alice.id, bob.id).await.unwrap();
    assert_eq!(outcome, Toggle::Added);

    let feed = svc.feed.home_feed(alice.id).await.unwrap();
    let ids: Vec<i32> = feed.iter().map(|item| item.post.id).collect();
    assert_eq!(ids, vec![b1.id, a1.id]);
    assert_eq!(feed[0].author, "bob");
    assert!(
        feed.windows(2)
            .all(|w| w[0].post.timestamp >= w[1].post.timestamp)
    );

    // Carol follows nobody: only her own post.
    let carol_feed = svc.feed.home_feed(carol.id).await.unwrap();
    assert_eq!(carol_feed.len(), 1);
    assert_eq!(carol_feed[0].post.caption, "c1");
}

#[tokio::test]
async fn test_follow_like_unfollow_scenario() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let a = user(&repos, "a").await;
    let b = user(&repos, "b").await;

    svc.graph.toggle_follow(a.id, b.id).await.unwrap();
    let p = svc.posts.create(b.id, "hi").await.unwrap();

    let seen = |feed: &[FeedItem]| -> Vec<(i32, bool)> {
        feed.iter().map(|item| (item.post.id, item.liked)).collect()
    };

    let feed = svc.feed.home_feed(a.id).await.unwrap();
    assert_eq!(seen(&feed), vec![(p.id, false)]);

    assert_eq!(svc.likes.toggle(a.id, p.id).await.unwrap(), Toggle::Added);
    let feed = svc.feed.home_feed(a.id).await.unwrap();
    assert_eq!(seen(&feed), vec![(p.id, true)]);
    assert_eq!(feed[0].like_count, 1);

    let (outcome, _) = svc.graph.toggle_follow(a.id, b.id).await.unwrap();
    assert_eq!(outcome, Toggle::Removed);
    assert!(svc.feed.home_feed(a.id).await.unwrap().is_empty());

    // B still sees the post, and A's like survives the unfollow.
    let b_feed = svc.feed.home_feed(b.id).await.unwrap();
    assert_eq!(seen(&b_feed), vec![(p.id, false)]);
    assert_eq!(b_feed[0].like_count, 1);
}

#[tokio::test]
async fn test_home_view_following_and_suggestions() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;
    let carol = user(&repos, "carol").await;

    svc.graph.toggle_follow(alice.id, bob.id).await.unwrap();

    let home = svc.feed.home(alice.id).await.unwrap();
    let following: Vec<i32> = home.following.iter().map(|u| u.id).collect();
    let suggestions: Vec<i32> = home.suggestions.iter().map(|u| u.id).collect();

    assert_eq!(following, vec![bob.id]);
    assert_eq!(suggestions, vec![carol.id]);
}

#[tokio::test]
async fn test_like_toggle_is_an_involution() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;
    let post = post_at(&repos, bob.id, "like me", 0).await;

    assert_eq!(svc.likes.toggle(alice.id, post.id).await.unwrap(), Toggle::Added);
    let feed = svc.feed.home_feed(bob.id).await.unwrap();
    assert_eq!(feed[0].like_count, 1);
    assert!(!feed[0].liked);

    assert_eq!(svc.likes.toggle(alice.id, post.id).await.unwrap(), Toggle::Removed);
    assert!(
        repos
            .likes
            .find_by_user_and_post(alice.id, post.id)
            .await
            .unwrap()
            .is_none()
    );

    let missing = svc.likes.toggle(alice.id, post.id + 100).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_follow_toggle_twice_restores_state() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;

    svc.graph.toggle_follow(alice.id, bob.id).await.unwrap();
    let (outcome, target) = svc.graph.toggle_follow(alice.id, bob.id).await.unwrap();

    assert_eq!(outcome, Toggle::Removed);
    assert_eq!(target.username, "bob");
    assert!(!svc.graph.is_following(alice.id, bob.id).await.unwrap());

    let (removed, _) = svc.graph.unfollow(alice.id, bob.id).await.unwrap();
    assert!(!removed);

    let self_follow = svc.graph.toggle_follow(alice.id, alice.id).await;
    assert!(matches!(self_follow, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_non_author_cannot_edit_or_delete() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let alice = user(&repos, "alice").await;
    let mallory = user(&repos, "mallory").await;
    let post = post_at(&repos, alice.id, "original", 0).await;
    let comment = svc
        .comments
        .create(alice.id, post.id, "first!")
        .await
        .unwrap();

    let edit = svc.posts.edit(mallory.id, post.id, "defaced").await;
    assert!(matches!(edit, Err(DomainError::Forbidden { .. })));
    let delete = svc.posts.delete(mallory.id, post.id).await;
    assert!(matches!(delete, Err(DomainError::Forbidden { .. })));
    let comment_edit = svc.comments.edit(mallory.id, comment.id, "spam").await;
    assert!(matches!(comment_edit, Err(DomainError::Forbidden { .. })));

    let stored = repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.caption, "original");
    let stored_comment = repos.comments.find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(stored_comment.text, "first!");
}

#[tokio::test]
async fn test_blank_caption_writes_nothing() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let alice = user(&repos, "alice").await;

    let result = svc.posts.create(alice.id, "   ").await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert!(repos.posts.find_by_authors(&[alice.id]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_long_captions_and_comments_are_stored_whole() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let alice = user(&repos, "alice").await;

    let caption = "x".repeat(2201);
    let post = svc.posts.create(alice.id, &caption).await.unwrap();
    assert_eq!(post.caption, caption);

    let text = "y".repeat(1001);
    let comment = svc.comments.create(alice.id, post.id, &text).await.unwrap();
    assert_eq!(comment.text, text);
}

#[tokio::test]
async fn test_author_edits_and_deletes_post() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;

    let post = svc.posts.create(alice.id, "  first draft ").await.unwrap();
    assert_eq!(post.caption, "first draft");

    let edited = svc.posts.edit(alice.id, post.id, "final").await.unwrap();
    assert_eq!(edited.caption, "final");
    assert_eq!(edited.timestamp, post.timestamp);

    svc.likes.toggle(bob.id, post.id).await.unwrap();
    svc.comments.create(bob.id, post.id, "great").await.unwrap();

    svc.posts.delete(alice.id, post.id).await.unwrap();
    assert!(repos.posts.find_by_id(post.id).await.unwrap().is_none());
    assert_eq!(repos.comments.count_by_post(post.id).await.unwrap(), 0);
    assert!(repos.likes.count_by_posts(&[post.id]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comments_render_oldest_first_with_authors() {
    let (_db, repos) = setup().await;
    let svc = services(&repos);
    let alice = user(&repos, "alice").await;
    let bob = user(&repos, "bob").await;
    let post = post_at(&repos, alice.id, "photo", 0).await;

    svc.comments.create(bob.id, post.id, "one").await.unwrap();
    svc.comments.create(alice.id, post.id, "two").await.unwrap();

    let feed = svc.feed.home_feed(alice.id).await.unwrap();
    let comments: Vec<(&str, &str)> = feed[0]
        .comments
        .iter()
        .map(|c| (c.author.as_str(), c.comment.text.as_str()))
        .collect();
    assert_eq!(comments, vec![("bob", "one"), ("alice", "two")]);

    let post_id = svc.comments.delete(bob.id, feed[0].comments[0].comment.id).await.unwrap();
    assert_eq!(post_id, post.id);
    assert_eq!(repos.comments.count_by_post(post.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_then_authenticate() {
    let (_db, repos) = setup().await;
    let accounts = AccountService::new(
        repos.users.clone(),
        Arc::new(Argon2PasswordService::new()),
        Arc::new(NoopEventSink),
    );

    let registered = accounts.register(" alice ", "pw123", "pw123").await.unwrap();
    assert_eq!(registered.username, "alice");

    let duplicate = accounts.register("alice", "other", "other").await;
    assert!(matches!(duplicate, Err(DomainError::Duplicate(_))));

    let user = accounts.authenticate("alice", "pw123").await.unwrap();
    assert_eq!(user.id, registered.id);

    let wrong = accounts.authenticate("alice", "nope").await;
    assert!(matches!(wrong, Err(DomainError::Unauthorized)));
    let unknown = accounts.authenticate("nobody", "pw123").await;
    assert!(matches!(unknown, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_register_accepts_short_and_unicode_usernames() {
    let (_db, repos) = setup().await;
    let accounts = AccountService::new(
        repos.users.clone(),
        Arc::new(Argon2PasswordService::new()),
        Arc::new(NoopEventSink),
    );

    let short = accounts.register("al", "pw", "pw").await.unwrap();
    assert_eq!(short.username, "al");
    let accented = accounts.register("josé", "pw", "pw").await.unwrap();
    assert_eq!(accented.username, "josé");

    let mismatch = accounts.register("bo", "pw", "wp").await;
    assert!(matches!(mismatch, Err(DomainError::Validation(_))));
    let blank = accounts.register("   ", "pw", "pw").await;
    assert!(matches!(blank, Err(DomainError::Validation(_))));
}
