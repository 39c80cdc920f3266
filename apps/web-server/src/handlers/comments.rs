use actix_web::{HttpRequest, HttpResponse, web};
use shutter_shared::Flash;
use shutter_shared::dto::CommentForm;

use crate::cookies::{pending_flash, redirect_with};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppResult, form_error};
use crate::state::AppState;
use crate::views;

use super::page;

/// POST /add_comment/{post_id}
pub async fn add_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let anchor = format!("/home#post-{post_id}");

    state
        .comments
        .create(identity.user_id, post_id, &form.text)
        .await
        .map_err(|e| form_error(e, &anchor))?;

    Ok(redirect_with(&anchor, Flash::success("Comment added!")))
}

/// GET /edit_comment/{id}
pub async fn edit_comment_form(
    req: HttpRequest,
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .get_owned(identity.user_id, path.into_inner())
        .await?;

    Ok(page(
        &req,
        views::edit_comment_page(&identity.username, &comment, pending_flash(&req).as_ref()),
    ))
}

/// POST /edit_comment/{id}
pub async fn edit_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let comment_id = path.into_inner();

    let comment = state
        .comments
        .edit(identity.user_id, comment_id, &form.text)
        .await
        .map_err(|e| form_error(e, &format!("/edit_comment/{comment_id}")))?;

    Ok(redirect_with(
        &format!("/home#post-{}", comment.post_id),
        Flash::success("Comment updated successfully!"),
    ))
}

/// POST /delete_comment/{id}
pub async fn delete_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post_id = state
        .comments
        .delete(identity.user_id, path.into_inner())
        .await?;

    Ok(redirect_with(
        &format!("/home#post-{post_id}"),
        Flash::success("Comment deleted successfully!"),
    ))
}
