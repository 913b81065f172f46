//! v001 -- Initial schema creation.
//!
//! Creates the four catalog tables: `admins`, `categories`, `decorations`
//! and `messages`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Admins
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS admins (
    id            TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    username      TEXT NOT NULL UNIQUE,        -- case-sensitive
    password_hash TEXT NOT NULL,               -- argon2id PHC string
    created_at    TEXT NOT NULL                -- RFC-3339
);

-- ----------------------------------------------------------------
-- Categories
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS categories (
    id         TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    name       TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Decorations
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS decorations (
    id                  TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    title               TEXT NOT NULL,
    description         TEXT NOT NULL DEFAULT '',
    original_price      REAL NOT NULL,
    discounted_price    REAL NOT NULL,
    discount_percentage REAL NOT NULL,
    image_url           TEXT,                       -- /uploads/<file> or NULL
    category_id         TEXT NOT NULL,              -- FK -> categories(id)
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL,

    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE RESTRICT
);

CREATE INDEX IF NOT EXISTS idx_decorations_category ON decorations(category_id);

-- ----------------------------------------------------------------
-- Contact messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id         TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    name       TEXT NOT NULL,
    email      TEXT NOT NULL,
    message    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_created ON messages(created_at DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
