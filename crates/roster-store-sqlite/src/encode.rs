//! Conversions between domain records and SQLite rows.
//!
//! External (Discord) ids are `u64` but SQLite integers are signed, so they
//! are stored bit-for-bit as `i64`; values above `i64::MAX` read back intact.

use roster_core::{Faction, User};
use rusqlite::Row;

// ─── External id ─────────────────────────────────────────────────────────────

pub fn encode_external_id(id: u64) -> i64 { id as i64 }

pub fn decode_external_id(v: i64) -> u64 { v as u64 }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, name, external_id";

pub fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
  Ok(User {
    id:          row.get(0)?,
    name:        row.get(1)?,
    external_id: decode_external_id(row.get(2)?),
  })
}

pub fn faction_from_row(row: &Row<'_>) -> rusqlite::Result<Faction> {
  Ok(Faction { id: row.get(0)?, name: row.get(1)? })
}

/// One row of the player ⋈ account ⋈ history ⋈ faction scan.
///
/// The history columns are nullable because of the LEFT JOIN; a player with
/// no history at all is an invariant breach reported by the finder.
#[derive(Debug, Clone)]
pub struct RawPlayerRow {
  // players
  pub player_id:    i64,
  pub name:         String,
  pub game_id:      Option<String>,
  pub level:        i64,
  pub is_farm:      bool,
  // accounts
  pub user_id:      i64,
  pub user_name:    String,
  pub external_id:  i64,
  // history + factions
  pub faction_id:   Option<i64>,
  pub faction_name: Option<String>,
}

impl RawPlayerRow {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      player_id:    row.get(0)?,
      name:         row.get(1)?,
      game_id:      row.get(2)?,
      level:        row.get(3)?,
      is_farm:      row.get(4)?,
      user_id:      row.get(5)?,
      user_name:    row.get(6)?,
      external_id:  row.get(7)?,
      faction_id:   row.get(8)?,
      faction_name: row.get(9)?,
    })
  }

  pub fn user(&self) -> User {
    User {
      id:          self.user_id,
      name:        self.user_name.clone(),
      external_id: decode_external_id(self.external_id),
    }
  }
}
