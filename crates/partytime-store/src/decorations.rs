//! CRUD operations for [`Decoration`] records.
//!
//! Reads join the owning category; writes take the flat row. The
//! `image_url` column is written verbatim: callers are responsible for only
//! ever storing paths produced by the server's media store.

use rusqlite::{params, params_from_iter};
use uuid::Uuid;

use crate::database::{decode_ts, decode_uuid, encode_ts, Database, UNICODE_LOWER};
use crate::error::{not_found, Result};
use crate::models::{Category, Decoration, DecorationFilter, DecorationWithCategory};

const DECORATION_COLUMNS: &str = "d.id, d.title, d.description, d.original_price, \
     d.discounted_price, d.discount_percentage, d.image_url, d.category_id, \
     d.created_at, d.updated_at";

impl Database {
    pub fn create_decoration(&self, decoration: &Decoration) -> Result<()> {
        self.conn().execute(
            "INSERT INTO decorations (id, title, description, original_price,
                                      discounted_price, discount_percentage, image_url,
                                      category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                decoration.id.to_string(),
                decoration.title,
                decoration.description,
                decoration.original_price,
                decoration.discounted_price,
                decoration.discount_percentage,
                decoration.image_url,
                decoration.category_id.to_string(),
                encode_ts(&decoration.created_at),
                encode_ts(&decoration.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Fetch the bare row.
    pub fn get_decoration(&self, id: Uuid) -> Result<Decoration> {
        self.conn()
            .query_row(
                &format!("SELECT {DECORATION_COLUMNS} FROM decorations d WHERE d.id = ?1"),
                params![id.to_string()],
                row_to_decoration,
            )
            .map_err(not_found)
    }

    /// Fetch the row together with its category.
    pub fn get_decoration_with_category(&self, id: Uuid) -> Result<DecorationWithCategory> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT {DECORATION_COLUMNS}, c.id, c.name, c.created_at
                     FROM decorations d JOIN categories c ON c.id = d.category_id
                     WHERE d.id = ?1"
                ),
                params![id.to_string()],
                row_to_decoration_with_category,
            )
            .map_err(not_found)
    }

    /// List decorations matching `filter`, oldest first.
    ///
    /// Search is case-insensitive over full Unicode, not only ASCII.
    pub fn list_decorations(
        &self,
        filter: &DecorationFilter,
    ) -> Result<Vec<DecorationWithCategory>> {
        let mut sql = format!(
            "SELECT {DECORATION_COLUMNS}, c.id, c.name, c.created_at
             FROM decorations d JOIN categories c ON c.id = d.category_id
             WHERE 1 = 1"
        );
        let mut values: Vec<String> = Vec::new();

        if let Some(category_id) = filter.category_id {
            values.push(category_id.to_string());
            sql.push_str(&format!(" AND d.category_id = ?{}", values.len()));
        }

        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if let Some(search) = search {
            values.push(like_pattern(search));
            let n = values.len();
            sql.push_str(&format!(
                " AND ({UNICODE_LOWER}(d.title) LIKE ?{n} ESCAPE '\\' \
                 OR {UNICODE_LOWER}(d.description) LIKE ?{n} ESCAPE '\\')"
            ));
        }

        sql.push_str(" ORDER BY d.created_at ASC");

        let mut stmt = self.conn().prepare(&sql)?;
        let rows =
            stmt.query_map(params_from_iter(values.iter()), row_to_decoration_with_category)?;

        let mut decorations = Vec::new();
        for row in rows {
            decorations.push(row?);
        }
        Ok(decorations)
    }

    /// Overwrite every mutable column of an existing row, including
    /// `image_url`. Returns `true` if the row exists.
    pub fn update_decoration(&self, decoration: &Decoration) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE decorations
             SET title = ?1, description = ?2, original_price = ?3, discounted_price = ?4,
                 discount_percentage = ?5, image_url = ?6, category_id = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                decoration.title,
                decoration.description,
                decoration.original_price,
                decoration.discounted_price,
                decoration.discount_percentage,
                decoration.image_url,
                decoration.category_id.to_string(),
                encode_ts(&decoration.updated_at),
                decoration.id.to_string(),
            ],
        )?;
        Ok(affected > 0)
    }

    // only removes the row, not the image on disk
    pub fn delete_decoration(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM decorations WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

/// Lower-cased `%needle%` with LIKE wildcards escaped.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_decoration(row: &rusqlite::Row<'_>) -> rusqlite::Result<Decoration> {
    let id_str: String = row.get(0)?;
    let category_str: String = row.get(7)?;
    let created_str: String = row.get(8)?;
    let updated_str: String = row.get(9)?;

    Ok(Decoration {
        id: decode_uuid(0, &id_str)?,
        title: row.get(1)?,
        description: row.get(2)?,
        original_price: row.get(3)?,
        discounted_price: row.get(4)?,
        discount_percentage: row.get(5)?,
        image_url: row.get(6)?,
        category_id: decode_uuid(7, &category_str)?,
        created_at: decode_ts(8, &created_str)?,
        updated_at: decode_ts(9, &updated_str)?,
    })
}

fn row_to_decoration_with_category(
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<DecorationWithCategory> {
    let decoration = row_to_decoration(row)?;

    let cat_id: String = row.get(10)?;
    let cat_created: String = row.get(12)?;
    let category = Category {
        id: decode_uuid(10, &cat_id)?,
        name: row.get(11)?,
        created_at: decode_ts(12, &cat_created)?,
    };

    Ok(DecorationWithCategory { decoration, category })
}
