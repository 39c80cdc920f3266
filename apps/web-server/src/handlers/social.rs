//! Follow graph handlers.

use actix_web::{HttpResponse, web};
use shutter_core::domain::Toggle;
use shutter_shared::Flash;

use crate::cookies::redirect_with;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /follow/{user_id} - toggles the edge.
pub async fn follow(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let (outcome, target) = state
        .graph
        .toggle_follow(identity.user_id, path.into_inner())
        .await?;

    let flash = match outcome {
        Toggle::Added => Flash::success(format!("You are now following {}", target.username)),
        Toggle::Removed => Flash::info(format!("You unfollowed {}", target.username)),
    };
    Ok(redirect_with("/home", flash))
}

/// POST /unfollow/{user_id}
pub async fn unfollow(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let (_, target) = state
        .graph
        .unfollow(identity.user_id, path.into_inner())
        .await?;

    Ok(redirect_with(
        "/home",
        Flash::info(format!("You unfollowed {}", target.username)),
    ))
}
