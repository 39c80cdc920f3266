//! Session handlers: login, registration, logout.

use actix_web::{HttpRequest, HttpResponse, web};
use shutter_core::domain::User;
use shutter_shared::Flash;
use shutter_shared::dto::{LoginForm, RegisterForm};

use crate::cookies::{
    clear_session_cookie, flash_cookie, pending_flash, see_other, session_cookie,
};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppResult, RedirectOnError};
use crate::state::AppState;
use crate::views;

use super::page;

/// GET /
pub async fn index(identity: OptionalIdentity) -> HttpResponse {
    let target = if identity.0.is_some() { "/home" } else { "/login" };
    see_other(target).finish()
}

/// GET /login
pub async fn login_form(req: HttpRequest, identity: OptionalIdentity) -> HttpResponse {
    if identity.0.is_some() {
        return see_other("/home").finish();
    }
    page(&req, views::login_page(pending_flash(&req).as_ref()))
}

/// POST /login
pub async fn login(state: web::Data<AppState>, form: web::Form<LoginForm>) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let user = state
        .accounts
        .authenticate(&form.username, &form.password)
        .await
        .or_redirect("/login")?;

    tracing::info!(user_id = user.id, "User logged in");
    start_session(&state, &user, Flash::success("Login successful!"))
}

/// GET /register
pub async fn register_form(req: HttpRequest, identity: OptionalIdentity) -> HttpResponse {
    if identity.0.is_some() {
        return see_other("/home").finish();
    }
    page(&req, views::register_page(pending_flash(&req).as_ref()))
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<RegisterForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let user = state
        .accounts
        .register(&form.username, &form.password, &form.confirm_password)
        .await
        .or_redirect("/register")?;

    tracing::info!(user_id = user.id, "User registered");
    start_session(
        &state,
        &user,
        Flash::success("Registration successful! Welcome to Shutter!"),
    )
}

/// GET|POST /logout
pub async fn logout(state: web::Data<AppState>, identity: OptionalIdentity) -> HttpResponse {
    if let Some(identity) = identity.0 {
        state.accounts.logout(identity.user_id, &identity.username);
    }

    see_other("/login")
        .cookie(clear_session_cookie())
        .cookie(flash_cookie(&Flash::info("You have been logged out")))
        .finish()
}

fn start_session(state: &AppState, user: &User, flash: Flash) -> AppResult<HttpResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(see_other("/home")
        .cookie(session_cookie(token, state.tokens.expiration_seconds()))
        .cookie(flash_cookie(&flash))
        .finish())
}
