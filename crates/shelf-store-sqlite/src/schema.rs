//! SQL schema for the Shelf SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL      -- argon2 PHC string, never plaintext
);

CREATE TABLE IF NOT EXISTS categories (
    category_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL
);

-- A category cannot be deleted while any product still points at it.
CREATE TABLE IF NOT EXISTS products (
    product_id  TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    price       TEXT NOT NULL,       -- decimal, stored in its string form
    category_id TEXT REFERENCES categories(category_id) ON DELETE RESTRICT
);

-- Append-only. No foreign keys: history outlives the user and product rows.
CREATE TABLE IF NOT EXISTS user_activity (
    activity_seq INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      TEXT NOT NULL,
    product_id   TEXT NOT NULL,
    action       TEXT NOT NULL,
    recorded_at  TEXT NOT NULL       -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS products_category_idx ON products(category_id);
CREATE INDEX IF NOT EXISTS activity_user_idx     ON user_activity(user_id);

PRAGMA user_version = 1;
";
