//! User shape normalization at the auth backend boundary.
//!
//! Endpoints disagree on field names (`id`/`_id`/`userId`, `name`/`username`
//! ...). Everything funnels through [`normalize_user`] so the rest of the
//! crate only ever sees [`AuthUser`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_METHOD: &str = "email";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    /// `email`, `google` or `github`.
    pub method: String,
    pub created_at: String,
}

/// Partial profile update. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl ProfileUpdate {
    pub fn changes_password(&self) -> bool {
        self.new_password.is_some()
    }

    /// Apply the non-secret fields to a locally cached user.
    pub(crate) fn apply_to(&self, user: &AuthUser) -> AuthUser {
        let mut next = user.clone();
        if let Some(name) = &self.name {
            next.name = name.trim().to_string();
        }
        if let Some(email) = &self.email {
            next.email = email.trim().to_string();
        }
        next
    }
}

fn first_text(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Build an [`AuthUser`] from a backend payload.
///
/// Accepts either the user object itself or an envelope with a `user` key.
/// Returns `None` when neither an id nor an email can be found.
pub fn normalize_user(value: &Value) -> Option<AuthUser> {
    let obj = match value.get("user") {
        Some(Value::Object(inner)) => inner,
        _ => value.as_object()?,
    };

    let id = first_text(obj, &["id", "_id", "userId"]).unwrap_or_default();
    let email = first_text(obj, &["email", "mail"]).unwrap_or_default();
    if id.is_empty() && email.is_empty() {
        return None;
    }

    Some(AuthUser {
        id,
        name: first_text(obj, &["name", "username", "fullName", "displayName"]).unwrap_or_default(),
        email,
        method: first_text(obj, &["method", "provider"])
            .map(|m| m.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_METHOD.to_string()),
        created_at: first_text(obj, &["createdAt", "created_at"]).unwrap_or_default(),
    })
}

/// Bearer token from a login/register response.
pub fn extract_token(value: &Value) -> Option<String> {
    ["access_token", "token", "accessToken"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
