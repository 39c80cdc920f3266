//! # Shutter Core
//!
//! The domain layer of Shutter: entities, ports, and the services that
//! assemble feeds and apply mutations.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
