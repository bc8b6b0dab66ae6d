use serde::{Deserialize, Serialize};

use super::Id;

pub const LOGIN_PATH: &str = "/auth/login";

/// Identity record of the logged in patron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<Id>,

    #[serde(default, alias = "displayEmail")]
    pub email: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

impl UserProfile {
    pub fn new(id: impl Into<Id>, email: impl ToString) -> Self {
        Self {
            id: Some(id.into()),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            mobile_number: None,
        }
    }

    /// A profile is only usable with a non-empty identifier and an email.
    pub fn is_valid(&self) -> bool {
        let has_id = matches!(self.id, Some(ref id) if !id.is_empty());
        has_id && !self.email.trim().is_empty()
    }

    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}
