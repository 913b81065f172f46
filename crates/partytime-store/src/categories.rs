//! CRUD operations for [`Category`] records.

use rusqlite::params;
use uuid::Uuid;

use crate::database::{decode_ts, decode_uuid, encode_ts, Database};
use crate::error::{not_found, Result};
use crate::models::Category;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new category. Fails with a constraint violation if the name
    /// is taken.
    pub fn create_category(&self, category: &Category) -> Result<()> {
        self.conn().execute(
            "INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![
                category.id.to_string(),
                category.name,
                encode_ts(&category.created_at),
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_category(&self, id: Uuid) -> Result<Category> {
        self.conn()
            .query_row(
                "SELECT id, name, created_at FROM categories WHERE id = ?1",
                params![id.to_string()],
                row_to_category,
            )
            .map_err(not_found)
    }

    /// List all categories, ordered by name.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, created_at FROM categories ORDER BY name ASC")?;

        let rows = stmt.query_map([], row_to_category)?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }

    // ------------------------------------------------------------------
    // Update / Delete
    // ------------------------------------------------------------------

    /// Rename a category. Returns `true` if a row was updated.
    pub fn rename_category(&self, id: Uuid, name: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Delete a category. Fails with a constraint violation while any
    /// decoration still references it.
    pub fn delete_category(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM categories WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(2)?;

    Ok(Category {
        id: decode_uuid(0, &id_str)?,
        name: row.get(1)?,
        created_at: decode_ts(2, &created_str)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::StoreError;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_list_sorted() {
        let db = Database::open_in_memory().unwrap();
        db.create_category(&category("Wedding")).unwrap();
        db.create_category(&category("Birthday")).unwrap();

        let names: Vec<_> = db
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Birthday", "Wedding"]);
    }

    #[test]
    fn duplicate_name_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.create_category(&category("Birthday")).unwrap();
        assert!(db
            .create_category(&category("Birthday"))
            .unwrap_err()
            .is_constraint_violation());
    }

    #[test]
    fn rename_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let c = category("Birthday");
        db.create_category(&c).unwrap();

        assert!(db.rename_category(c.id, "Birthdays").unwrap());
        assert_eq!(db.get_category(c.id).unwrap().name, "Birthdays");

        assert!(db.delete_category(c.id).unwrap());
        assert!(matches!(db.get_category(c.id), Err(StoreError::NotFound)));
        assert!(!db.delete_category(c.id).unwrap());
    }
}
