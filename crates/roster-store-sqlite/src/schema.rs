//! SQL schema for a tenant store.
//!
//! The schema version lives in `PRAGMA user_version`. A store at version 0 has
//! never been bootstrapped; [`bootstrap`] runs only then, inside the caller's
//! transaction, and never touches a store that already holds data.

use roster_core::{Faction, User};
use rusqlite::Connection;

pub const SCHEMA_VERSION: i64 = 1;

/// Table DDL. Not idempotent on purpose: it must only ever run on an empty
/// store.
const SCHEMA: &str = "
CREATE TABLE accounts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    external_id INTEGER NOT NULL DEFAULT 0   -- u64 stored bitwise; 0 = unlinked
);

CREATE TABLE factions (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT    NOT NULL
);

CREATE TABLE players (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL REFERENCES accounts(id),
    name       TEXT    NOT NULL,
    game_id    TEXT,
    level      INTEGER NOT NULL DEFAULT 0,
    is_farm    INTEGER NOT NULL DEFAULT 0
);

-- Append-only affiliation log. The highest seq per player is the current
-- faction. Rows are only deleted together with their player.
CREATE TABLE player_faction_history (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id  INTEGER NOT NULL REFERENCES players(id),
    faction_id INTEGER NOT NULL REFERENCES factions(id),
    seq        INTEGER NOT NULL,
    UNIQUE (player_id, seq)
);

CREATE INDEX players_name_idx    ON players(name);
CREATE INDEX players_game_id_idx ON players(game_id);
CREATE INDEX players_account_idx ON players(account_id);
CREATE INDEX accounts_name_idx   ON accounts(name);
CREATE INDEX accounts_ext_idx    ON accounts(external_id);
";

/// Per-connection settings; SQLite does not persist them, so this runs on
/// every open. In-memory databases keep their `memory` journal mode.
pub fn configure(conn: &Connection) -> rusqlite::Result<()> {
  let _mode: String =
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
  conn.pragma_update(None, "foreign_keys", true)?;
  Ok(())
}

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
  conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Create all tables and the two sentinel rows, then stamp the version.
pub fn bootstrap(conn: &Connection) -> rusqlite::Result<()> {
  conn.execute_batch(SCHEMA)?;
  conn.execute(
    "INSERT INTO accounts (id, name, external_id) VALUES (?1, ?2, 0)",
    rusqlite::params![User::DEFAULT_ID, User::DEFAULT_NAME],
  )?;
  conn.execute(
    "INSERT INTO factions (id, name) VALUES (?1, ?2)",
    rusqlite::params![Faction::NONE_ID, Faction::NONE_NAME],
  )?;
  conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
  Ok(())
}
