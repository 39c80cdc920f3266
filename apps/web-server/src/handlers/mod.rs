//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod feed;
mod health;
mod posts;
mod social;

#[cfg(test)]
mod tests;

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::cookies::clear_flash_cookie;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(auth::index))
        .route("/health", web::get().to(health::health_check))
        // Session
        .service(
            web::resource("/login")
                .route(web::get().to(auth::login_form))
                .route(web::post().to(auth::login)),
        )
        .service(
            web::resource("/register")
                .route(web::get().to(auth::register_form))
                .route(web::post().to(auth::register)),
        )
        .service(
            web::resource("/logout")
                .route(web::get().to(auth::logout))
                .route(web::post().to(auth::logout)),
        )
        // Feed
        .route("/home", web::get().to(feed::home))
        // Posts
        .route("/create_post", web::post().to(posts::create_post))
        .service(
            web::resource("/edit_post/{id}")
                .route(web::get().to(posts::edit_post_form))
                .route(web::post().to(posts::edit_post)),
        )
        .route("/delete_post/{id}", web::post().to(posts::delete_post))
        .route("/toggle_like/{id}", web::post().to(posts::toggle_like))
        // Comments
        .route("/add_comment/{post_id}", web::post().to(comments::add_comment))
        .service(
            web::resource("/edit_comment/{id}")
                .route(web::get().to(comments::edit_comment_form))
                .route(web::post().to(comments::edit_comment)),
        )
        .route("/delete_comment/{id}", web::post().to(comments::delete_comment))
        // Social graph
        .route("/follow/{user_id}", web::post().to(social::follow))
        .route("/unfollow/{user_id}", web::post().to(social::unfollow));
}

/// A rendered HTML page. Consumes the pending flash message, if any.
fn page(req: &HttpRequest, html: String) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::html());
    if req.cookie(shutter_shared::flash::FLASH_COOKIE).is_some() {
        response.cookie(clear_flash_cookie());
    }
    response.body(html)
}
