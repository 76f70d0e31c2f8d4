//! The `RosterStore` trait — one tenant's player registry.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Callers such as a command router depend on this abstraction and hand it
//! already-validated arguments; the store does not re-validate input.

use std::future::Future;

use crate::{
  entity::{Faction, Player, TenantId, User},
  filter::PlayerFilter,
};

/// Abstraction over a single tenant's store.
///
/// Lookups that miss return `Ok(None)`; errors are reserved for faults in the
/// underlying storage. A store assumes one mutating call at a time; callers
/// that share a handle across tasks must serialise writes themselves.
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn tenant_id(&self) -> TenantId;

  fn tenant_name(&self) -> &str;

  // ── Factions ──────────────────────────────────────────────────────────

  /// Insert a faction and add it to the in-memory faction set. Names are not
  /// checked for uniqueness; callers look up the name first.
  fn add_faction(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Faction, Self::Error>> + Send + '_;

  /// Rename a faction by id. A missing id is a no-op.
  fn update_faction<'a>(
    &'a self,
    faction: &'a Faction,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Exact, case-sensitive name lookup in the in-memory faction set.
  fn find_faction(&self, name: &str) -> Option<Faction>;

  fn faction(&self, id: i64) -> Option<Faction>;

  /// Every faction of the tenant, sentinel included, in id order.
  fn factions(&self) -> Vec<Faction>;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Insert an account. `external_id == 0` means not linked.
  fn add_user(
    &self,
    name: String,
    external_id: u64,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Persist name and external id by account id. A missing id is a no-op.
  fn update_user<'a>(
    &'a self,
    user: &'a User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn find_user_by_external_id(
    &self,
    external_id: u64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Players ───────────────────────────────────────────────────────────

  /// Create a player owned by the sentinel account, with exactly one history
  /// entry: `faction`, or the sentinel faction when `None`.
  fn add_player(
    &self,
    name: String,
    faction: Option<Faction>,
    game_id: Option<String>,
  ) -> impl Future<Output = Result<Player, Self::Error>> + Send + '_;

  /// Persist name, owning account, game id, level and farm flag. The faction
  /// history is left untouched.
  fn update_player<'a>(
    &'a self,
    player: &'a Player,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Append `faction` to the player's persisted history, making it the
  /// current faction. Earlier entries are kept as they are.
  ///
  /// Callers update `player.faction_history` in memory first (see
  /// [`Player::assign_faction`]).
  fn append_faction_history<'a>(
    &'a self,
    player: &'a Player,
    faction: &'a Faction,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete a player and its whole history. Returns `false` if no such
  /// player existed.
  fn remove_player<'a>(
    &'a self,
    player: &'a Player,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Link a player to an external identity.
  ///
  /// An unclaimed player (owned by the sentinel account) is handed to the
  /// account holding `external_id`, creating one named `external_name` if
  /// none exists. A claimed player's account has its external id replaced
  /// in place. Returns the account that owns the player afterwards.
  ///
  /// The change is all-or-nothing; `player.user` is only updated once it
  /// has been persisted.
  fn connect_player<'a>(
    &'a self,
    player: &'a mut Player,
    external_id: u64,
    external_name: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All players matching `filter` in ascending id order, each with its
  /// full, recency-ordered faction history. An empty filter matches all.
  fn find_players<'a>(
    &'a self,
    filter: &'a PlayerFilter,
  ) -> impl Future<Output = Result<Vec<Player>, Self::Error>> + Send + 'a;

  /// A single player by id, or `None`.
  fn find_player(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Player>, Self::Error>> + Send + '_;
}
