//! Entity records — factions, user accounts and players.
//!
//! All identifiers are tenant-local integers assigned by the store. Id `1` is
//! reserved in both the faction and the account table for a sentinel row that
//! is created when a tenant store is bootstrapped.

use serde::{Deserialize, Serialize};

/// Identifies a tenant; maps 1:1 to an external community (guild) id.
pub type TenantId = u64;

// ─── Faction ─────────────────────────────────────────────────────────────────

/// A named group a player can be affiliated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
  pub id:   i64,
  pub name: String,
}

impl Faction {
  /// Id of the sentinel "no faction" row.
  pub const NONE_ID: i64 = 1;
  /// Name given to the sentinel faction at bootstrap.
  pub const NONE_NAME: &'static str = "NoFaction";
}

// ─── User ────────────────────────────────────────────────────────────────────

/// An account that owns one or more players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:          i64,
  pub name:        String,
  /// External (Discord) identity; `0` means not linked.
  pub external_id: u64,
}

impl User {
  /// Id of the sentinel account that owns every unclaimed player.
  pub const DEFAULT_ID: i64 = 1;
  /// Name given to the sentinel account at bootstrap.
  pub const DEFAULT_NAME: &'static str = "NoUser";

  /// Whether this is the sentinel account.
  pub fn is_default(&self) -> bool { self.id == Self::DEFAULT_ID }
}

// ─── Player ──────────────────────────────────────────────────────────────────

/// A player record with its owning account and faction history.
///
/// `faction_history` is ordered most-recent first and is never empty for a
/// player read from or returned by a store: index 0 is the current faction,
/// later entries are strictly older. Re-joining a faction adds a new entry;
/// the history is not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
  pub id:              i64,
  pub name:            String,
  pub game_id:         Option<String>,
  pub level:           i64,
  pub is_farm:         bool,
  pub user:            User,
  pub faction_history: Vec<Faction>,
}

impl Player {
  /// The player's current faction (head of the history).
  pub fn current_faction(&self) -> Option<&Faction> {
    self.faction_history.first()
  }

  /// Make `faction` the current faction in memory.
  ///
  /// Pair with [`RosterStore::append_faction_history`] to persist the change.
  ///
  /// [`RosterStore::append_faction_history`]: crate::store::RosterStore::append_faction_history
  pub fn assign_faction(&mut self, faction: Faction) {
    self.faction_history.insert(0, faction);
  }

  /// Whether the player is in `faction` right now; older entries are ignored.
  pub fn is_in_faction(&self, faction_id: i64) -> bool {
    self.current_faction().is_some_and(|f| f.id == faction_id)
  }
}
