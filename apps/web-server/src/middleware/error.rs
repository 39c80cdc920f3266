//! Error handling - every failure becomes a redirect with a flash message.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use shutter_core::error::{DomainError, RepoError};
use shutter_core::ports::AuthError;
use shutter_shared::Flash;

use crate::cookies::{clear_session_cookie, flash_cookie, see_other};

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Application-level error type. Responds with `303 See Other`.
#[derive(Debug)]
pub enum AppError {
    NotFound(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    Conflict(String),
    /// Wrong username or password.
    InvalidCredentials,
    /// No usable session; sends the browser to the login page.
    LoginRequired,
    Internal(String),
    /// Any of the above, redirecting somewhere other than the default.
    Redirect {
        location: String,
        source: Box<AppError>,
    },
}

impl AppError {
    /// Redirect to `location` instead of the default page.
    pub fn at(self, location: impl Into<String>) -> Self {
        match self {
            AppError::Redirect { source, .. } => AppError::Redirect {
                location: location.into(),
                source,
            },
            AppError::LoginRequired => AppError::LoginRequired,
            other => AppError::Redirect {
                location: location.into(),
                source: Box::new(other),
            },
        }
    }

    fn root(&self) -> &AppError {
        match self {
            AppError::Redirect { source, .. } => source.root(),
            other => other,
        }
    }

    fn location(&self) -> &str {
        match self {
            AppError::Redirect { location, .. } => location,
            AppError::InvalidCredentials | AppError::LoginRequired => "/login",
            _ => "/home",
        }
    }

    /// Flash text shown to the user.
    pub fn message(&self) -> String {
        match self.root() {
            AppError::NotFound(entity) => format!("{} not found", capitalize(entity)),
            AppError::Forbidden(entity) => format!("You are not allowed to modify this {entity}"),
            AppError::BadRequest(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::LoginRequired => "Please login to access this page".to_string(),
            AppError::Internal(_) | AppError::Redirect { .. } => GENERIC_FAILURE.to_string(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(entity) => write!(f, "Not found: {entity}"),
            AppError::Forbidden(entity) => write!(f, "Forbidden: {entity}"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::LoginRequired => write!(f, "Login required"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
            AppError::Redirect { location, source } => write!(f, "{source} (-> {location})"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self.root() {
            tracing::error!("Internal error: {}", detail);
        }

        let mut response = see_other(self.location());
        response.cookie(flash_cookie(&Flash::error(self.message())));
        if matches!(self, AppError::LoginRequired) {
            response.cookie(clear_session_cookie());
        }
        response.finish()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => AppError::NotFound(entity_type),
            DomainError::Forbidden { entity_type, .. } => AppError::Forbidden(entity_type),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::InvalidCredentials,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::from(DomainError::from(err))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Send validation failures back to the form at `location`; everything
/// else keeps its default destination.
pub fn form_error(err: DomainError, location: &str) -> AppError {
    match err {
        DomainError::Validation(_) => AppError::from(err).at(location),
        other => AppError::from(other),
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Redirect a failed result somewhere other than the default page.
pub trait RedirectOnError<T> {
    fn or_redirect(self, location: &str) -> AppResult<T>;
}

impl<T, E: Into<AppError>> RedirectOnError<T> for Result<T, E> {
    fn or_redirect(self, location: &str) -> AppResult<T> {
        self.map_err(|e| e.into().at(location))
    }
}
