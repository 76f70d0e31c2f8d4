//! [`Registry`] — tenant id → open [`TenantStore`].

use std::collections::HashMap;

use roster_core::{TenantId, store::RosterStore as _};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{Error, RegistryConfig, Result, TenantStore, migrate};

/// Process-wide cache of open tenant stores.
///
/// A tenant is opened (and, on first ever access, provisioned or migrated
/// from its legacy snapshot) the first time it is resolved; afterwards the
/// same handle is returned until the registry is dropped. Nothing is evicted:
/// each cached tenant holds one SQLite connection and its worker thread, so
/// the registry is sized for one tenant per community served, on the order
/// of tens to a few hundred.
///
/// Resolution is serialised, which is what keeps migration to at most once
/// per tenant per process.
#[derive(Debug)]
pub struct Registry {
  config: RegistryConfig,
  stores: Mutex<HashMap<TenantId, TenantStore>>,
}

impl Registry {
  pub fn new(config: RegistryConfig) -> Self {
    Self { config, stores: Mutex::new(HashMap::new()) }
  }

  pub fn config(&self) -> &RegistryConfig { &self.config }

  /// Return the store for `tenant_id`, opening it on first reference.
  ///
  /// A failure to open is returned as-is and nothing is cached, so it is not
  /// retried behind the caller's back.
  pub async fn resolve(&self, tenant_id: TenantId, tenant_name: &str) -> Result<TenantStore> {
    let mut stores = self.stores.lock().await;
    if let Some(store) = stores.get(&tenant_id) {
      return Ok(store.clone());
    }

    let store = migrate::open_tenant(&self.config, tenant_id, tenant_name).await?;
    debug!(tenant = tenant_id, name = store.tenant_name(), "cached tenant store");
    stores.insert(tenant_id, store.clone());
    Ok(store)
  }

  /// The cached store for `tenant_id`, without opening anything.
  pub async fn get(&self, tenant_id: TenantId) -> Option<TenantStore> {
    self.stores.lock().await.get(&tenant_id).cloned()
  }

  /// Ids of every tenant resolved so far, ascending.
  pub async fn tenants(&self) -> Vec<TenantId> {
    let mut ids: Vec<_> = self.stores.lock().await.keys().copied().collect();
    ids.sort_unstable();
    ids
  }

  /// Resolve every tenant that has a `<tenant_id>.json` snapshot in the data
  /// directory, running pending legacy migrations up front. Returns the
  /// number of tenants resolved. Other files are ignored.
  pub async fn preload(&self) -> Result<usize> {
    let dir = &self.config.data_dir;
    let mut entries = tokio::fs::read_dir(dir)
      .await
      .map_err(|e| Error::io(dir, e))?;

    let mut resolved = 0;
    while let Some(entry) = entries.next_entry().await.map_err(|e| Error::io(dir, e))? {
      let path = entry.path();
      let Some(tenant_id) = RegistryConfig::tenant_of_snapshot(&path) else {
        continue;
      };
      let Some(snapshot) = migrate::read_snapshot(&path).await? else {
        continue;
      };

      self.resolve(tenant_id, &snapshot.name).await?;
      resolved += 1;
    }

    info!(tenants = resolved, dir = %dir.display(), "preloaded tenants");
    Ok(resolved)
  }
}
