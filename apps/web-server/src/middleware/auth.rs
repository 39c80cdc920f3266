//! Session extractors.

use std::future::Future;
use std::pin::Pin;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use shutter_core::ports::AuthError;

use crate::cookies::SESSION_COOKIE;
use crate::middleware::error::{AppError, RedirectOnError};
use crate::state::AppState;

/// The signed-in user, resolved from the session cookie.
///
/// Handlers that take an `Identity` redirect to `/login` when there is no
/// valid session:
/// ```ignore
/// async fn home(identity: Identity) -> AppResult<HttpResponse> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i32,
    pub username: String,
}

async fn resolve(req: HttpRequest) -> Result<Identity, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| {
            AppError::Internal("AppState not found in app data".to_string()).at("/login")
        })?;

    let token = req
        .cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AppError::LoginRequired)?;

    let claims = state.tokens.validate_token(&token).map_err(|e| {
        match e {
            AuthError::TokenExpired => tracing::debug!("Session expired"),
            other => tracing::warn!(error = %other, "Rejected session token"),
        }
        AppError::LoginRequired
    })?;

    // The account may have been removed since the token was issued.
    // Store failures redirect to /login, never /home.
    match state.accounts.find(claims.user_id).await.or_redirect("/login")? {
        Some(user) => Ok(Identity {
            user_id: user.id,
            username: user.username,
        }),
        None => {
            state.accounts.invalid_session(claims.user_id);
            Err(AppError::LoginRequired)
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        Box::pin(resolve(req.clone()))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { Ok(OptionalIdentity(resolve(req).await.ok())) })
    }
}
