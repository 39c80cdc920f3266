//! Session and flash cookies, and the redirect responses that carry them.

use std::sync::OnceLock;

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use shutter_shared::Flash;
use shutter_shared::flash::FLASH_COOKIE;

pub const SESSION_COOKIE: &str = "session";

static SECURE_COOKIES: OnceLock<bool> = OnceLock::new();

/// Mark session and flash cookies `Secure`. Called once at startup.
pub fn set_secure(secure: bool) {
    if SECURE_COOKIES.set(secure).is_err() {
        tracing::warn!("Cookie policy already set, ignoring");
    }
}

fn secure() -> bool {
    SECURE_COOKIES.get().copied().unwrap_or(false)
}

pub fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    build_session_cookie(token, max_age_secs, secure())
}

fn build_session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

pub fn flash_cookie(flash: &Flash) -> Cookie<'static> {
    build_flash_cookie(flash, secure())
}

fn build_flash_cookie(flash: &Flash, secure: bool) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, flash.to_cookie_value())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::minutes(5))
        .finish()
}

pub fn clear_flash_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// The pending flash message, if any. The caller clears the cookie.
pub fn pending_flash(req: &HttpRequest) -> Option<Flash> {
    req.cookie(FLASH_COOKIE)
        .and_then(|c| Flash::from_cookie_value(c.value()))
}

/// Start a `303 See Other` to `location`.
pub fn see_other(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location.to_string()));
    builder
}

/// `303 See Other` to `location` with a flash message.
pub fn redirect_with(location: &str, flash: Flash) -> HttpResponse {
    see_other(location).cookie(flash_cookie(&flash)).finish()
}
