//! # partytime-store
//!
//! Relational storage for the PartyTime catalog, backed by SQLite.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for the admin
//! identity, categories, decorations and contact messages.

pub mod admins;
pub mod categories;
pub mod database;
pub mod decorations;
pub mod messages;
pub mod migrations;
pub mod models;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
