//! Post and like handlers.

use actix_web::{HttpRequest, HttpResponse, web};
use shutter_core::domain::Toggle;
use shutter_shared::Flash;
use shutter_shared::dto::PostForm;

use crate::cookies::{pending_flash, redirect_with, see_other};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppResult, form_error};
use crate::state::AppState;
use crate::views;

use super::page;

/// POST /create_post
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(identity.user_id, &form.caption).await?;

    tracing::debug!(post_id = post.id, "Post created");
    Ok(redirect_with("/home", Flash::success("Post created!")))
}

/// GET /edit_post/{id}
pub async fn edit_post_form(
    req: HttpRequest,
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_owned(identity.user_id, path.into_inner()).await?;

    Ok(page(
        &req,
        views::edit_post_page(&identity.username, &post, pending_flash(&req).as_ref()),
    ))
}

/// POST /edit_post/{id}
pub async fn edit_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    state
        .posts
        .edit(identity.user_id, post_id, &form.caption)
        .await
        .map_err(|e| form_error(e, &format!("/edit_post/{post_id}")))?;

    Ok(redirect_with(
        &format!("/home#post-{post_id}"),
        Flash::success("Post updated successfully!"),
    ))
}

/// POST /delete_post/{id}
pub async fn delete_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state.posts.delete(identity.user_id, path.into_inner()).await?;

    Ok(redirect_with("/home", Flash::success("Post deleted successfully!")))
}

/// POST /toggle_like/{id}
pub async fn toggle_like(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let outcome = state.likes.toggle(identity.user_id, post_id).await?;

    tracing::debug!(post_id, liked = outcome == Toggle::Added, "Like toggled");
    Ok(see_other(&format!("/home#post-{post_id}")).finish())
}
