//! Opening a tenant store: reopen, import a legacy snapshot, or provision.
//!
//! Whether a relational store exists is decided by the schema version stamped
//! in the database file, not by a separate "migrated" flag. A store at
//! version 0 is bootstrapped and, if `<tenant_id>.json` is present, filled
//! from the legacy snapshot in the same transaction. Either the store comes
//! out fully migrated or it stays at version 0 and the next open retries.

use std::path::Path;

use roster_core::{
  Faction, TenantId,
  legacy::{LegacyPlayer, LegacySnapshot},
};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::{
  Error, RegistryConfig, Result, TenantStore,
  repo::{self, NewPlayer},
  schema,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImportStats {
  pub players:  usize,
  pub factions: usize,
}

/// Open the store for `tenant_id`, creating or migrating it as needed.
///
/// `tenant_name` is kept on the handle; when empty, the name recorded in
/// `<tenant_id>.json` (legacy snapshot or descriptor) is used instead.
pub async fn open_tenant(
  config: &RegistryConfig,
  tenant_id: TenantId,
  tenant_name: &str,
) -> Result<TenantStore> {
  let db_path = config.store_path(tenant_id);
  let conn = tokio_rusqlite::Connection::open(&db_path).await?;

  let existing = conn
    .call(|conn| {
      schema::configure(conn)?;
      if schema::schema_version(conn)? == 0 {
        return Ok(None);
      }
      Ok(Some(repo::load_factions(conn)?))
    })
    .await?;

  let snapshot_path = config.snapshot_path(tenant_id);

  if let Some(factions) = existing {
    let name = if tenant_name.is_empty() {
      recorded_name(&snapshot_path).await
    } else {
      tenant_name.to_owned()
    };
    info!(tenant = tenant_id, factions = factions.len(), "opened tenant store");
    return Ok(TenantStore::from_parts(tenant_id, &name, conn, factions));
  }

  let legacy = read_snapshot(&snapshot_path).await?;

  if let Some(snapshot) = &legacy
    && snapshot.id != tenant_id
  {
    warn!(
      tenant = tenant_id,
      embedded = snapshot.id,
      path = %snapshot_path.display(),
      "legacy snapshot embeds a different tenant id; importing under the file name"
    );
  }

  let name = match &legacy {
    Some(snapshot) if tenant_name.is_empty() => snapshot.name.clone(),
    _ => tenant_name.to_owned(),
  };
  let had_legacy = legacy.is_some();

  // Every bootstrapped store has a descriptor on disk.
  if !had_legacy {
    write_descriptor(&snapshot_path, &LegacySnapshot::new(tenant_id, name.clone())).await?;
  }

  let (factions, stats) = conn
    .call(move |conn| {
      let tx = conn.transaction()?;
      schema::bootstrap(&tx)?;
      let stats = match &legacy {
        Some(snapshot) => import(&tx, &snapshot.players)?,
        None => ImportStats::default(),
      };
      let factions = repo::load_factions(&tx)?;
      tx.commit()?;
      Ok((factions, stats))
    })
    .await?;

  if had_legacy {
    info!(
      tenant = tenant_id,
      players = stats.players,
      factions = stats.factions,
      "migrated legacy snapshot"
    );
  } else {
    info!(tenant = tenant_id, name = %name, "provisioned new tenant store");
  }

  Ok(TenantStore::from_parts(tenant_id, &name, conn, factions))
}

/// Read and decode a snapshot; a missing file is `Ok(None)`.
pub(crate) async fn read_snapshot(path: &Path) -> Result<Option<LegacySnapshot>> {
  let bytes = match tokio::fs::read(path).await {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(Error::io(path, e)),
  };
  LegacySnapshot::from_json(&bytes)
    .map(Some)
    .map_err(|source| Error::Snapshot { path: path.to_owned(), source })
}

/// Name recorded in the snapshot or descriptor next to a live store. The
/// store itself opens regardless, so an unreadable file only costs the name.
async fn recorded_name(path: &Path) -> String {
  match read_snapshot(path).await {
    Ok(Some(snapshot)) => snapshot.name,
    Ok(None) => String::new(),
    Err(e) => {
      warn!(path = %path.display(), error = %e, "could not read tenant name");
      String::new()
    }
  }
}

async fn write_descriptor(path: &Path, snapshot: &LegacySnapshot) -> Result<()> {
  let json = snapshot.to_json_pretty()?;
  tokio::fs::write(path, json)
    .await
    .map_err(|e| Error::io(path, e))
}

/// Insert every legacy player with its faction label resolved by exact name,
/// creating factions the first time a label is seen. Runs inside the
/// bootstrap transaction.
pub(crate) fn import(
  conn: &Connection,
  players: &[LegacyPlayer],
) -> rusqlite::Result<ImportStats> {
  let mut factions: Vec<Faction> = repo::load_factions(conn)?;
  let mut stats = ImportStats::default();

  for legacy in players {
    let label = legacy.faction_name();
    let faction_id = match factions.iter().find(|f| f.name == label) {
      Some(f) => f.id,
      None => {
        let created = repo::insert_faction(conn, label)?;
        let id = created.id;
        factions.push(created);
        stats.factions += 1;
        id
      }
    };

    let new = NewPlayer {
      name:    legacy.name.clone(),
      game_id: legacy.game_id.clone(),
      level:   legacy.level,
      is_farm: legacy.is_farm,
    };
    repo::insert_player(conn, &new, faction_id)?;
    stats.players += 1;
  }

  Ok(stats)
}
