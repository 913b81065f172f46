//! CRUD operations for [`Admin`] records.

use rusqlite::params;
use uuid::Uuid;

use crate::database::{decode_ts, decode_uuid, encode_ts, Database};
use crate::error::{not_found, Result};
use crate::models::Admin;

impl Database {
    /// Insert a new admin identity.
    pub fn create_admin(&self, admin: &Admin) -> Result<()> {
        self.conn().execute(
            "INSERT INTO admins (id, username, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                admin.id.to_string(),
                admin.username,
                admin.password_hash,
                encode_ts(&admin.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_admin(&self, id: Uuid) -> Result<Admin> {
        self.conn()
            .query_row(
                "SELECT id, username, password_hash, created_at FROM admins WHERE id = ?1",
                params![id.to_string()],
                row_to_admin,
            )
            .map_err(not_found)
    }

    /// Exact, case-sensitive lookup.
    pub fn get_admin_by_username(&self, username: &str) -> Result<Admin> {
        self.conn()
            .query_row(
                "SELECT id, username, password_hash, created_at FROM admins WHERE username = ?1",
                params![username],
                row_to_admin,
            )
            .map_err(not_found)
    }

    /// Replace the stored password hash. Returns `true` if the admin exists.
    pub fn update_admin_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE admins SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

fn row_to_admin(row: &rusqlite::Row<'_>) -> rusqlite::Result<Admin> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(3)?;

    Ok(Admin {
        id: decode_uuid(0, &id_str)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: decode_ts(3, &created_str)?,
    })
}
