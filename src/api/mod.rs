pub mod error;
pub mod request;
pub mod song;
pub mod user;
pub mod venue;

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

pub const HEADER_ACCEPT: &str = "Accept";
pub const MIME_JSON: &str = "application/json";
pub const MIME_TEXT: &str = "text/plain";

/// Identifier issued by the backend. Some endpoints return numbers, others strings,
/// both are accepted and passed back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(u64),
    Text(String),
}

impl Id {
    pub fn is_empty(&self) -> bool {
        match self {
            Id::Number(_) => false,
            Id::Text(text) => text.trim().is_empty(),
        }
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(number) => write!(f, "{number}"),
            Id::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(number) => Id::Number(number),
            Err(_) => Id::Text(s.to_string()),
        }
    }
}

impl From<u64> for Id {
    fn from(number: u64) -> Self {
        Id::Number(number)
    }
}
