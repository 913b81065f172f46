//! Session token claims.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin ID).
    pub sub: String,
    /// Admin username at issuance time.
    pub username: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// The admin acting on a request, decoded from a verified token and placed
/// in the request extensions by the session guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSubject {
    pub id: Uuid,
    pub username: String,
}
