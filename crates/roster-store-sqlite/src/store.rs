//! [`TenantStore`] — the SQLite implementation of [`RosterStore`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use roster_core::{
  Faction, Player, PlayerFilter, TenantId, User, store::RosterStore,
};
use tracing::{debug, warn};

use crate::{
  Error, Result, finder,
  repo::{self, NewPlayer},
  schema,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// One tenant's registry, backed by a single SQLite connection.
///
/// The tenant's factions are mirrored in memory; every faction write goes
/// through this type and updates the mirror after the database write
/// succeeds. Cloning is cheap; clones share the connection and the mirror.
#[derive(Clone)]
pub struct TenantStore {
  tenant_id: TenantId,
  name:      Arc<str>,
  conn:      tokio_rusqlite::Connection,
  factions:  Arc<RwLock<Vec<Faction>>>,
}

impl std::fmt::Debug for TenantStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TenantStore")
      .field("tenant_id", &self.tenant_id)
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}

impl TenantStore {
  pub(crate) fn from_parts(
    tenant_id: TenantId,
    name: &str,
    conn: tokio_rusqlite::Connection,
    factions: Vec<Faction>,
  ) -> Self {
    Self {
      tenant_id,
      name: Arc::from(name),
      conn,
      factions: Arc::new(RwLock::new(factions)),
    }
  }

  /// Open a bootstrapped in-memory store — useful for testing.
  pub async fn open_in_memory(tenant_id: TenantId, name: &str) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let factions = conn
      .call(|conn| {
        schema::configure(conn)?;
        let tx = conn.transaction()?;
        schema::bootstrap(&tx)?;
        let factions = repo::load_factions(&tx)?;
        tx.commit()?;
        Ok(factions)
      })
      .await?;
    Ok(Self::from_parts(tenant_id, name, conn, factions))
  }

  fn factions_read(&self) -> RwLockReadGuard<'_, Vec<Faction>> {
    self.factions.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn factions_write(&self) -> RwLockWriteGuard<'_, Vec<Faction>> {
    self.factions.write().unwrap_or_else(PoisonError::into_inner)
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for TenantStore {
  type Error = Error;

  fn tenant_id(&self) -> TenantId { self.tenant_id }

  fn tenant_name(&self) -> &str { &self.name }

  // ── Factions ──────────────────────────────────────────────────────────────

  async fn add_faction(&self, name: String) -> Result<Faction> {
    let faction = self
      .conn
      .call(move |conn| Ok(repo::insert_faction(conn, &name)?))
      .await?;

    debug!(tenant = self.tenant_id, id = faction.id, name = %faction.name, "added faction");
    self.factions_write().push(faction.clone());
    Ok(faction)
  }

  async fn update_faction(&self, faction: &Faction) -> Result<()> {
    let owned = faction.clone();
    let updated = self
      .conn
      .call(move |conn| Ok(repo::update_faction(conn, &owned)?))
      .await?;

    if updated > 0 {
      let mut factions = self.factions_write();
      if let Some(cached) = factions.iter_mut().find(|f| f.id == faction.id) {
        cached.name.clone_from(&faction.name);
      }
    }
    Ok(())
  }

  fn find_faction(&self, name: &str) -> Option<Faction> {
    self.factions_read().iter().find(|f| f.name == name).cloned()
  }

  fn faction(&self, id: i64) -> Option<Faction> {
    self.factions_read().iter().find(|f| f.id == id).cloned()
  }

  fn factions(&self) -> Vec<Faction> { self.factions_read().clone() }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, name: String, external_id: u64) -> Result<User> {
    let user = self
      .conn
      .call(move |conn| Ok(repo::insert_user(conn, &name, external_id)?))
      .await?;

    debug!(tenant = self.tenant_id, id = user.id, name = %user.name, "added user");
    Ok(user)
  }

  async fn update_user(&self, user: &User) -> Result<()> {
    let owned = user.clone();
    self
      .conn
      .call(move |conn| Ok(repo::update_user(conn, &owned)?))
      .await?;
    Ok(())
  }

  async fn user(&self, id: i64) -> Result<Option<User>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(repo::select_user(conn, id)?))
        .await?,
    )
  }

  async fn find_user(&self, name: &str) -> Result<Option<User>> {
    let name = name.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| Ok(repo::select_user_by_name(conn, &name)?))
        .await?,
    )
  }

  async fn find_user_by_external_id(&self, external_id: u64) -> Result<Option<User>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(repo::select_user_by_external_id(conn, external_id)?))
        .await?,
    )
  }

  // ── Players ───────────────────────────────────────────────────────────────

  async fn add_player(
    &self,
    name: String,
    faction: Option<Faction>,
    game_id: Option<String>,
  ) -> Result<Player> {
    let faction = match faction {
      Some(f) => f,
      None => self
        .faction(Faction::NONE_ID)
        .ok_or(Error::UnknownFaction(Faction::NONE_ID))?,
    };

    let new = NewPlayer::new(name, game_id);
    let faction_id = faction.id;
    let (id, user, new) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let id = repo::insert_player(&tx, &new, faction_id)?;
        let user = repo::select_user(&tx, User::DEFAULT_ID)?;
        tx.commit()?;
        Ok((id, user, new))
      })
      .await?;

    debug!(tenant = self.tenant_id, id, name = %new.name, faction = faction_id, "added player");

    let user = user.unwrap_or_else(|| User {
      id:          User::DEFAULT_ID,
      name:        User::DEFAULT_NAME.to_owned(),
      external_id: 0,
    });
    Ok(Player {
      id,
      name: new.name,
      game_id: new.game_id,
      level: new.level,
      is_farm: new.is_farm,
      user,
      faction_history: vec![faction],
    })
  }

  async fn update_player(&self, player: &Player) -> Result<()> {
    let owned = player.clone();
    self
      .conn
      .call(move |conn| Ok(repo::update_player(conn, &owned)?))
      .await?;
    Ok(())
  }

  async fn append_faction_history(&self, player: &Player, faction: &Faction) -> Result<()> {
    let (player_id, faction_id) = (player.id, faction.id);
    self
      .conn
      .call(move |conn| Ok(repo::append_history(conn, player_id, faction_id)?))
      .await?;

    debug!(tenant = self.tenant_id, player = player_id, faction = faction_id, "faction changed");
    Ok(())
  }

  async fn remove_player(&self, player: &Player) -> Result<bool> {
    let player_id = player.id;
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = repo::delete_player(&tx, player_id)?;
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    if removed == 0 {
      warn!(tenant = self.tenant_id, player = player_id, "remove: no such player");
    }
    Ok(removed > 0)
  }

  async fn connect_player(
    &self,
    player: &mut Player,
    external_id: u64,
    external_name: String,
  ) -> Result<User> {
    let mut owned = player.clone();
    let user = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let user = if owned.user.is_default() {
          let user = match repo::select_user_by_external_id(&tx, external_id)? {
            Some(existing) => existing,
            None => repo::insert_user(&tx, &external_name, external_id)?,
          };
          owned.user = user.clone();
          repo::update_player(&tx, &owned)?;
          user
        } else {
          let user = User { external_id, ..owned.user };
          repo::update_user(&tx, &user)?;
          user
        };
        tx.commit()?;
        Ok(user)
      })
      .await?;

    debug!(tenant = self.tenant_id, player = player.id, user = user.id, "connected player");
    player.user = user.clone();
    Ok(user)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_players(&self, filter: &PlayerFilter) -> Result<Vec<Player>> {
    let owned = filter.clone();
    let rows = self
      .conn
      .call(move |conn| Ok(finder::select_rows(conn, &owned)?))
      .await?;
    finder::assemble(rows, filter.faction)
  }

  async fn find_player(&self, id: i64) -> Result<Option<Player>> {
    let rows = self
      .conn
      .call(move |conn| Ok(finder::select_rows_for(conn, id)?))
      .await?;
    Ok(finder::assemble(rows, None)?.into_iter().next())
  }
}
