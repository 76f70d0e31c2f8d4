//! Query type for player lookups.

use serde::{Deserialize, Serialize};

use crate::entity::{Faction, User};

/// Parameters for [`RosterStore::find_players`].
///
/// Every predicate is optional and they combine with AND. Name, game id and
/// owning user match exactly against the player row. The faction predicate
/// matches the player's *current* faction only; a player who merely used to
/// be in the faction does not match.
///
/// [`RosterStore::find_players`]: crate::store::RosterStore::find_players
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFilter {
  pub faction: Option<i64>,
  pub name:    Option<String>,
  pub game_id: Option<String>,
  pub user:    Option<i64>,
}

impl PlayerFilter {
  pub fn new() -> Self { Self::default() }

  pub fn faction(mut self, faction: &Faction) -> Self {
    self.faction = Some(faction.id);
    self
  }

  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn game_id(mut self, game_id: impl Into<String>) -> Self {
    self.game_id = Some(game_id.into());
    self
  }

  pub fn user(mut self, user: &User) -> Self {
    self.user = Some(user.id);
    self
  }

  /// `true` when no predicate is set, i.e. the filter matches every player.
  pub fn is_empty(&self) -> bool {
    self.faction.is_none()
      && self.name.is_none()
      && self.game_id.is_none()
      && self.user.is_none()
  }
}
