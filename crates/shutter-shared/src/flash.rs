//! One-shot messages carried across a redirect.
//!
//! Cookie form: `<level>:<percent-encoded message>`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the cookie that carries a pending flash message.
pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
            FlashLevel::Info => "info",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashLevel::Success),
            "error" => Some(FlashLevel::Error),
            "info" => Some(FlashLevel::Info),
            _ => None,
        }
    }
}

impl fmt::Display for FlashLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn to_cookie_value(&self) -> String {
        format!("{}:{}", self.level, urlencoding::encode(&self.message))
    }

    /// Parse a cookie value; anything malformed is dropped.
    pub fn from_cookie_value(raw: &str) -> Option<Self> {
        let (level, message) = raw.split_once(':')?;
        let level = FlashLevel::parse(level)?;
        let message = urlencoding::decode(message).ok()?.into_owned();

        Some(Self { level, message })
    }
}
