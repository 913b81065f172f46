//! # partytime-server
//!
//! REST backend of the PartyTime decoration storefront.
//!
//! - **Admin authentication**: argon2id credentials, 24-hour HS256 session
//!   tokens carried in an `HttpOnly` cookie or a bearer header
//! - **Catalog API** (axum) for categories, decorations and contact messages
//! - **Media lifecycle** for decoration images stored on local disk

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod provision;
