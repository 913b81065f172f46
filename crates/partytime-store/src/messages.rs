//! CRUD operations for contact [`Message`] records.

use rusqlite::params;
use uuid::Uuid;

use crate::database::{decode_ts, decode_uuid, encode_ts, Database};
use crate::error::{Result, StoreError};
use crate::models::Message;

impl Database {
    pub fn create_message(&self, message: &Message) -> Result<()> {
        self.conn().execute(
            "INSERT INTO messages (id, name, email, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.id.to_string(),
                message.name,
                message.email,
                message.message,
                encode_ts(&message.created_at),
            ],
        )?;
        Ok(())
    }

    /// All messages, newest first.
    pub fn list_messages(&self) -> Result<Vec<Message>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, email, message, created_at
             FROM messages
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], row_to_message)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn delete_message(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM messages WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(4)?;

    Ok(Message {
        id: decode_uuid(0, &id_str)?,
        name: row.get(1)?,
        email: row.get(2)?,
        message: row.get(3)?,
        created_at: decode_ts(4, &created_str)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn message(body: &str, age_secs: i64) -> Message {
        Message {
            id: Uuid::new_v4(),
            name: "Dana".into(),
            email: "dana@example.com".into(),
            message: body.into(),
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn newest_first() {
        let db = Database::open_in_memory().unwrap();
        db.create_message(&message("old", 60)).unwrap();
        db.create_message(&message("new", 0)).unwrap();
        db.create_message(&message("middle", 30)).unwrap();

        let bodies: Vec<_> = db
            .list_messages()
            .unwrap()
            .into_iter()
            .map(|m| m.message)
            .collect();
        assert_eq!(bodies, vec!["new", "middle", "old"]);
    }

    #[test]
    fn delete() {
        let db = Database::open_in_memory().unwrap();
        let m = message("hello", 0);
        db.create_message(&m).unwrap();

        assert!(db.delete_message(m.id).unwrap());
        assert!(!db.delete_message(m.id).unwrap());
        assert!(db.list_messages().unwrap().is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(message("hi", 0)).unwrap();
        assert!(json.get("createdAt").is_some());
    }
}
