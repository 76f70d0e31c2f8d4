//! Persistence statements for factions, accounts, players and history.
//!
//! Everything here is synchronous and takes a plain [`Connection`], so the
//! same statements serve both single calls from [`TenantStore`] and the
//! multi-statement transactions of player creation and legacy migration
//! (a [`rusqlite::Transaction`] derefs to a `Connection`).
//!
//! [`TenantStore`]: crate::TenantStore

use roster_core::{Faction, Player, User};
use rusqlite::{Connection, OptionalExtension as _};

use crate::encode::{USER_COLUMNS, encode_external_id, faction_from_row, user_from_row};

// ─── Factions ────────────────────────────────────────────────────────────────

pub fn load_factions(conn: &Connection) -> rusqlite::Result<Vec<Faction>> {
  let mut stmt = conn.prepare("SELECT id, name FROM factions ORDER BY id")?;
  let rows = stmt
    .query_map([], faction_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn insert_faction(conn: &Connection, name: &str) -> rusqlite::Result<Faction> {
  conn.execute("INSERT INTO factions (name) VALUES (?1)", rusqlite::params![name])?;
  Ok(Faction { id: conn.last_insert_rowid(), name: name.to_owned() })
}

pub fn update_faction(conn: &Connection, faction: &Faction) -> rusqlite::Result<usize> {
  conn.execute(
    "UPDATE factions SET name = ?1 WHERE id = ?2",
    rusqlite::params![faction.name, faction.id],
  )
}

// ─── Accounts ────────────────────────────────────────────────────────────────

pub fn insert_user(
  conn: &Connection,
  name: &str,
  external_id: u64,
) -> rusqlite::Result<User> {
  conn.execute(
    "INSERT INTO accounts (name, external_id) VALUES (?1, ?2)",
    rusqlite::params![name, encode_external_id(external_id)],
  )?;
  Ok(User { id: conn.last_insert_rowid(), name: name.to_owned(), external_id })
}

pub fn update_user(conn: &Connection, user: &User) -> rusqlite::Result<usize> {
  conn.execute(
    "UPDATE accounts SET name = ?1, external_id = ?2 WHERE id = ?3",
    rusqlite::params![user.name, encode_external_id(user.external_id), user.id],
  )
}

/// Look an account up by a single column. `column` is always a literal from
/// this crate, never caller input.
fn select_user_by(
  conn: &Connection,
  column: &'static str,
  value: impl rusqlite::ToSql,
) -> rusqlite::Result<Option<User>> {
  conn
    .query_row(
      &format!(
        "SELECT {USER_COLUMNS} FROM accounts WHERE {column} = ?1 ORDER BY id LIMIT 1"
      ),
      rusqlite::params![value],
      user_from_row,
    )
    .optional()
}

pub fn select_user(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
  select_user_by(conn, "id", id)
}

pub fn select_user_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<User>> {
  select_user_by(conn, "name", name)
}

pub fn select_user_by_external_id(
  conn: &Connection,
  external_id: u64,
) -> rusqlite::Result<Option<User>> {
  select_user_by(conn, "external_id", encode_external_id(external_id))
}

// ─── Players ─────────────────────────────────────────────────────────────────

/// Column values for a player row that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewPlayer {
  pub name:    String,
  pub game_id: Option<String>,
  pub level:   i64,
  pub is_farm: bool,
}

impl NewPlayer {
  pub fn new(name: String, game_id: Option<String>) -> Self {
    Self { name, game_id, level: 0, is_farm: false }
  }
}

/// Insert a player owned by the sentinel account plus its first history row.
///
/// Must run inside a transaction so the two rows land together.
pub fn insert_player(
  conn: &Connection,
  player: &NewPlayer,
  faction_id: i64,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO players (account_id, name, game_id, level, is_farm)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      User::DEFAULT_ID,
      player.name,
      player.game_id,
      player.level,
      player.is_farm,
    ],
  )?;
  let player_id = conn.last_insert_rowid();
  append_history(conn, player_id, faction_id)?;
  Ok(player_id)
}

pub fn update_player(conn: &Connection, player: &Player) -> rusqlite::Result<usize> {
  conn.execute(
    "UPDATE players
     SET name = ?1, account_id = ?2, game_id = ?3, level = ?4, is_farm = ?5
     WHERE id = ?6",
    rusqlite::params![
      player.name,
      player.user.id,
      player.game_id,
      player.level,
      player.is_farm,
      player.id,
    ],
  )
}

/// Add a history row with the next sequence number for `player_id`.
pub fn append_history(
  conn: &Connection,
  player_id: i64,
  faction_id: i64,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO player_faction_history (player_id, faction_id, seq)
     SELECT ?1, ?2, COALESCE(MAX(seq), 0) + 1
     FROM player_faction_history
     WHERE player_id = ?1",
    rusqlite::params![player_id, faction_id],
  )?;
  Ok(())
}

/// Delete a player's history and then the player row. Returns the number of
/// player rows removed (0 or 1). Must run inside a transaction.
pub fn delete_player(conn: &Connection, player_id: i64) -> rusqlite::Result<usize> {
  conn.execute(
    "DELETE FROM player_faction_history WHERE player_id = ?1",
    rusqlite::params![player_id],
  )?;
  conn.execute("DELETE FROM players WHERE id = ?1", rusqlite::params![player_id])
}
