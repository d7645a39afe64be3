//! SQL schema for the vigil SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Tag reads are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS events (
    event_id    TEXT PRIMARY KEY,
    tag_id      TEXT NOT NULL,
    status      TEXT NOT NULL,
    observed_at TEXT NOT NULL    -- ISO 8601 UTC; server-assigned when absent
);

-- One row per token value; re-registration refreshes registered_at.
CREATE TABLE IF NOT EXISTS tokens (
    value         TEXT PRIMARY KEY,
    registered_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    username      TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS events_observed_idx ON events(observed_at);

PRAGMA user_version = 1;
";
