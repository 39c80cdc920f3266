//! # Shutter Infrastructure
//!
//! Concrete implementations of the ports defined in `shutter-core`:
//! SeaORM repositories (Postgres or SQLite), Argon2 password hashing,
//! JWT session tokens, and the tracing-backed event sink.

pub mod auth;
pub mod database;
pub mod events;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, Repositories};
pub use events::TracingEventSink;
