use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use migration::{Migrator, MigratorTrait};
use shutter_core::domain::User;
use shutter_infra::{DatabaseConfig, JwtConfig};
use shutter_shared::dto::{CommentForm, LoginForm, PostForm, RegisterForm};
use shutter_shared::{Flash, FlashLevel};

use super::configure_routes;
use crate::cookies::SESSION_COOKIE;
use crate::state::AppState;

async fn test_state() -> AppState {
    let db = shutter_infra::database::connect(&DatabaseConfig::in_memory())
        .await
        .unwrap();
    Migrator::up(&db, None).await.unwrap();

    AppState::new(
        db,
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "shutter-test".to_string(),
        },
    )
}

async fn signed_in(state: &AppState, username: &str) -> (User, Cookie<'static>) {
    let user = state
        .accounts
        .register(username, "pw12345", "pw12345")
        .await
        .unwrap();
    let token = state.tokens.generate_token(user.id, &user.username).unwrap();
    (user, Cookie::new(SESSION_COOKIE, token))
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

fn flash<B>(resp: &ServiceResponse<B>) -> Option<Flash> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "flash")
        .and_then(|c| Flash::from_cookie_value(c.value()))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_root_redirects_by_session() {
    let state = test_state().await;
    let (_, session) = signed_in(&state, "alice").await;
    let app = init_app!(state);

    let anonymous = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(anonymous.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&anonymous), "/login");

    let req = test::TestRequest::get().uri("/").cookie(session).to_request();
    let known = test::call_service(&app, req).await;
    assert_eq!(location(&known), "/home");
}

#[actix_web::test]
async fn test_protected_page_requires_login() {
    let state = test_state().await;
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/home").to_request()).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(
        flash(&resp),
        Some(Flash::error("Please login to access this page"))
    );
}

#[actix_web::test]
async fn test_register_sets_session_and_shows_home() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form(RegisterForm {
            username: "alice".to_string(),
            password: "pw12345".to_string(),
            confirm_password: "pw12345".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/home");
    let message = flash(&resp).unwrap();
    assert_eq!(message.level, FlashLevel::Success);
    assert_eq!(message.message, "Registration successful! Welcome to Shutter!");
    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap()
        .into_owned();
    assert!(session.http_only().unwrap_or(false));

    let req = test::TestRequest::get().uri("/home").cookie(session).to_request();
    let home = test::call_service(&app, req).await;
    assert_eq!(home.status(), StatusCode::OK);
    let body = test::read_body(home).await;
    assert!(String::from_utf8_lossy(&body).contains("@alice"));
}

#[actix_web::test]
async fn test_register_mismatch_returns_to_form() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form(RegisterForm {
            username: "alice".to_string(),
            password: "one".to_string(),
            confirm_password: "two".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/register");
    assert_eq!(flash(&resp), Some(Flash::error("Passwords do not match")));
}

#[actix_web::test]
async fn test_login_failures() {
    let state = test_state().await;
    signed_in(&state, "alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(LoginForm {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        })
        .to_request();
    let wrong = test::call_service(&app, req).await;
    assert_eq!(location(&wrong), "/login");
    assert_eq!(flash(&wrong), Some(Flash::error("Invalid credentials")));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(LoginForm::default())
        .to_request();
    let empty = test::call_service(&app, req).await;
    assert_eq!(location(&empty), "/login");
    assert_eq!(
        flash(&empty),
        Some(Flash::error("Username and password required"))
    );

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(LoginForm {
            username: "alice".to_string(),
            password: "pw12345".to_string(),
        })
        .to_request();
    let ok = test::call_service(&app, req).await;
    assert_eq!(location(&ok), "/home");
    assert_eq!(flash(&ok), Some(Flash::success("Login successful!")));
}

#[actix_web::test]
async fn test_post_like_comment_flow() {
    let state = test_state().await;
    let (alice, session) = signed_in(&state, "alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/create_post")
        .cookie(session.clone())
        .set_form(PostForm {
            caption: "Golden hour".to_string(),
        })
        .to_request();
    let created = test::call_service(&app, req).await;
    assert_eq!(flash(&created), Some(Flash::success("Post created!")));

    let post = state.feed.home_feed(alice.id).await.unwrap()[0].post.clone();

    let req = test::TestRequest::post()
        .uri(&format!("/toggle_like/{}", post.id))
        .cookie(session.clone())
        .to_request();
    let liked = test::call_service(&app, req).await;
    assert_eq!(location(&liked), format!("/home#post-{}", post.id));

    let req = test::TestRequest::post()
        .uri(&format!("/add_comment/{}", post.id))
        .cookie(session.clone())
        .set_form(CommentForm {
            text: "What a view".to_string(),
        })
        .to_request();
    let commented = test::call_service(&app, req).await;
    assert_eq!(flash(&commented), Some(Flash::success("Comment added!")));

    let feed = state.feed.home_feed(alice.id).await.unwrap();
    assert!(feed[0].liked);
    assert_eq!(feed[0].like_count, 1);
    assert_eq!(feed[0].comments[0].comment.text, "What a view");

    let req = test::TestRequest::post()
        .uri(&format!("/delete_post/{}", post.id))
        .cookie(session)
        .to_request();
    let deleted = test::call_service(&app, req).await;
    assert_eq!(flash(&deleted), Some(Flash::success("Post deleted successfully!")));
    assert!(state.feed.home_feed(alice.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_empty_caption_is_rejected() {
    let state = test_state().await;
    let (alice, session) = signed_in(&state, "alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/create_post")
        .cookie(session)
        .set_form(PostForm {
            caption: "   ".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/home");
    assert_eq!(flash(&resp).unwrap().level, FlashLevel::Error);
    assert!(state.feed.home_feed(alice.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_non_author_cannot_edit_post() {
    let state = test_state().await;
    let (alice, _) = signed_in(&state, "alice").await;
    let (_, mallory_session) = signed_in(&state, "mallory").await;
    let post = state.posts.create(alice.id, "mine").await.unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/edit_post/{}", post.id))
        .cookie(mallory_session.clone())
        .set_form(PostForm {
            caption: "defaced".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/home");
    assert_eq!(
        flash(&resp),
        Some(Flash::error("You are not allowed to modify this post"))
    );
    assert_eq!(state.posts.find(post.id).await.unwrap().caption, "mine");

    let req = test::TestRequest::get()
        .uri(&format!("/edit_post/{}", post.id))
        .cookie(mallory_session)
        .to_request();
    let form = test::call_service(&app, req).await;
    assert_eq!(form.status(), StatusCode::SEE_OTHER);
}

#[actix_web::test]
async fn test_author_edit_with_blank_caption_returns_to_form() {
    let state = test_state().await;
    let (alice, session) = signed_in(&state, "alice").await;
    let post = state.posts.create(alice.id, "draft").await.unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/edit_post/{}", post.id))
        .cookie(session.clone())
        .set_form(PostForm {
            caption: "".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), format!("/edit_post/{}", post.id));

    let req = test::TestRequest::get()
        .uri(&format!("/edit_post/{}", post.id))
        .cookie(session)
        .to_request();
    let form = test::call_service(&app, req).await;
    assert_eq!(form.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_follow_toggles_and_unfollow_is_idempotent() {
    let state = test_state().await;
    let (alice, session) = signed_in(&state, "alice").await;
    let (bob, _) = signed_in(&state, "bob").await;
    let app = init_app!(state);

    let follow = |cookie: Cookie<'static>| {
        test::TestRequest::post()
            .uri(&format!("/follow/{}", bob.id))
            .cookie(cookie)
            .to_request()
    };

    let first = test::call_service(&app, follow(session.clone())).await;
    assert_eq!(flash(&first), Some(Flash::success("You are now following bob")));
    assert!(state.graph.is_following(alice.id, bob.id).await.unwrap());

    let second = test::call_service(&app, follow(session.clone())).await;
    assert_eq!(flash(&second), Some(Flash::info("You unfollowed bob")));
    assert!(!state.graph.is_following(alice.id, bob.id).await.unwrap());

    let req = test::TestRequest::post()
        .uri(&format!("/unfollow/{}", bob.id))
        .cookie(session.clone())
        .to_request();
    let unfollow = test::call_service(&app, req).await;
    assert_eq!(flash(&unfollow), Some(Flash::info("You unfollowed bob")));

    let req = test::TestRequest::post()
        .uri(&format!("/follow/{}", alice.id))
        .cookie(session)
        .to_request();
    let own = test::call_service(&app, req).await;
    assert_eq!(flash(&own), Some(Flash::error("You cannot follow yourself")));
}

#[actix_web::test]
async fn test_session_for_missing_user_is_cleared() {
    let state = test_state().await;
    let token = state.tokens.generate_token(999, "ghost").unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/home")
        .cookie(Cookie::new(SESSION_COOKIE, token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/login");
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap();
    assert_eq!(cleared.value(), "");
}

#[actix_web::test]
async fn test_logout_clears_session() {
    let state = test_state().await;
    let (_, session) = signed_in(&state, "alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/logout")
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/login");
    assert_eq!(flash(&resp), Some(Flash::info("You have been logged out")));
}

#[actix_web::test]
async fn test_health_reports_database() {
    let state = test_state().await;
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], "ok");
}

#[actix_web::test]
async fn test_store_failure_during_session_lookup_lands_on_login() {
    let state = test_state().await;
    let (_, session) = signed_in(&state, "alice").await;
    let app = init_app!(state);

    state.db.clone().close().await.unwrap();

    let req = test::TestRequest::get()
        .uri("/home")
        .cookie(session.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(
        flash(&resp),
        Some(Flash::error("Something went wrong. Please try again."))
    );

    let req = test::TestRequest::get().uri("/login").cookie(session).to_request();
    let login = test::call_service(&app, req).await;
    assert_eq!(login.status(), StatusCode::OK);
}
