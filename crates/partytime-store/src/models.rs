//! Domain model structs persisted in the catalog database.
//!
//! Everything except [`Admin`] derives `Serialize` so it can be returned by
//! the HTTP layer as-is. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// The privileged back-office identity.
///
/// Deliberately not `Serialize`: the password hash must never leave the
/// server.
#[derive(Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: Uuid,
    /// Case-sensitive login name.
    pub username: String,
    /// argon2id PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Admin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admin")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Decoration
// ---------------------------------------------------------------------------

/// A catalog item as stored in the `decorations` table.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub original_price: f64,
    pub discounted_price: f64,
    pub discount_percentage: f64,
    /// Web path of the current image (`/uploads/<file>`), if any.
    pub image_url: Option<String>,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A decoration joined with its category, as returned by read endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DecorationWithCategory {
    #[serde(flatten)]
    pub decoration: Decoration,
    pub category: Category,
}

/// Filters for [`Database::list_decorations`](crate::Database::list_decorations).
#[derive(Debug, Clone, Default)]
pub struct DecorationFilter {
    pub category_id: Option<Uuid>,
    /// Case-insensitive substring matched against title or description.
    pub search: Option<String>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A contact-form submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
