use actix_web::{HttpRequest, HttpResponse, web};

use crate::cookies::pending_flash;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

use super::page;

/// GET /home
pub async fn home(
    req: HttpRequest,
    identity: Identity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let view = state.feed.home(identity.user_id).await?;

    Ok(page(
        &req,
        views::home_page(
            identity.user_id,
            &identity.username,
            &view,
            pending_flash(&req).as_ref(),
        ),
    ))
}
