//! SQL schema for the Veil SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per stored record. rowid doubles as insertion order.
CREATE TABLE IF NOT EXISTS personal_data (
    reference_token         TEXT PRIMARY KEY,
    personal_token          TEXT NOT NULL,
    key_name                TEXT NOT NULL,
    value_json              TEXT NOT NULL,   -- JSON payload
    source                  TEXT NOT NULL,
    reasons                 TEXT NOT NULL DEFAULT '[]',
    processing_requirements TEXT NOT NULL DEFAULT '[]',
    disposed_at             TEXT,            -- RFC 3339 UTC or NULL
    metadata                TEXT NOT NULL DEFAULT '{}',
    recorded_at             TEXT NOT NULL    -- RFC 3339 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS personal_data_subject_idx
  ON personal_data(personal_token);
CREATE INDEX IF NOT EXISTS personal_data_key_idx
  ON personal_data(personal_token, key_name);
CREATE INDEX IF NOT EXISTS personal_data_disposed_idx
  ON personal_data(disposed_at) WHERE disposed_at IS NOT NULL;

PRAGMA user_version = 1;
";
