//! JSON request and response bodies exchanged with the PartyTime API.
//!
//! Field names follow the camelCase convention of the web client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `POST /admin/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /admin/change-password`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// `GET /admin/me`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeResponse {
    pub id: Uuid,
    pub username: String,
}

/// Body of every plain acknowledgement and every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `POST /categories` and `PUT /categories/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

/// `POST /messages` (public contact form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Query string of `GET /decorations`. Empty values mean "no filter".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationQuery {
    pub category_id: Option<String>,
    pub search: Option<String>,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_uses_camel_case() {
        let req: ChangePasswordRequest =
            serde_json::from_str(r#"{"oldPassword":"a","newPassword":"b"}"#).unwrap();
        assert_eq!(req.old_password, "a");
        assert_eq!(req.new_password, "b");
    }

    #[test]
    fn test_decoration_query_optional_fields() {
        let q: DecorationQuery = serde_json::from_str("{}").unwrap();
        assert!(q.category_id.is_none());
        assert!(q.search.is_none());
    }
}
