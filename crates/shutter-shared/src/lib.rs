//! # Shutter Shared
//!
//! Types that cross the HTTP boundary: submitted forms, flash messages
//! and JSON response wrappers.

pub mod dto;
pub mod flash;
pub mod response;

pub use flash::{Flash, FlashLevel};
pub use response::ApiResponse;
