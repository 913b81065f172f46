//! Admin authentication.
//!
//! - [`credentials`]: username + argon2 hash lookup and verification
//! - [`jwt`]: signed, 24-hour session tokens
//! - [`session`]: cookie / bearer transport and the route guard

pub mod claims;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod session;

pub use claims::{AuthSubject, Claims};
pub use credentials::{CredentialError, CredentialStore};
pub use jwt::{InvalidToken, TokenService};
