//! Legacy flat-file snapshot format.
//!
//! Before the relational store existed, each tenant was persisted as one JSON
//! document holding the tenant id, its name and a flat list of players. Field
//! names are PascalCase and every player field may be missing, in which case
//! the legacy writer's defaults apply. Unknown fields are ignored.
//!
//! The same document shape doubles as the tenant descriptor written for newly
//! provisioned tenants (with an empty player list), so a data directory can be
//! rediscovered on startup.

use serde::{Deserialize, Serialize};

use crate::{Result, TenantId, entity::Faction};

fn default_player_name() -> String { "NoName".to_owned() }

fn default_game_id() -> Option<String> { Some("N/A".to_owned()) }

fn default_faction() -> Option<String> { Some(Faction::NONE_NAME.to_owned()) }

fn default_legacy_id() -> i64 { -1 }

/// One tenant's legacy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacySnapshot {
  pub id:      TenantId,
  #[serde(default)]
  pub name:    String,
  #[serde(default)]
  pub players: Vec<LegacyPlayer>,
}

/// A player entry; the faction is a free-text label, not an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyPlayer {
  #[serde(default = "default_legacy_id")]
  pub id:      i64,
  #[serde(default = "default_player_name")]
  pub name:    String,
  #[serde(default)]
  pub level:   i64,
  #[serde(default)]
  pub is_farm: bool,
  #[serde(default = "default_game_id")]
  pub game_id: Option<String>,
  #[serde(default = "default_faction")]
  pub faction: Option<String>,
}

impl LegacyPlayer {
  /// The faction label, falling back to the sentinel faction's name when the
  /// legacy writer stored `null`.
  pub fn faction_name(&self) -> &str {
    self.faction.as_deref().unwrap_or(Faction::NONE_NAME)
  }
}

impl LegacySnapshot {
  /// An empty descriptor for a tenant with no legacy players.
  pub fn new(id: TenantId, name: impl Into<String>) -> Self {
    Self { id, name: name.into(), players: Vec::new() }
  }

  pub fn from_json(bytes: &[u8]) -> Result<Self> {
    Ok(serde_json::from_slice(bytes)?)
  }

  /// Pretty-printed, matching the indented output of the legacy writer.
  pub fn to_json_pretty(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}
