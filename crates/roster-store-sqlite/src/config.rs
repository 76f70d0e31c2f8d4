//! Registry configuration.

use std::path::{Path, PathBuf};

use roster_core::TenantId;
use serde::Deserialize;

fn default_data_dir() -> PathBuf { PathBuf::from("db") }

/// Where tenant files live.
///
/// Each tenant owns `<data_dir>/<tenant_id>.db` (the relational store) and
/// optionally `<data_dir>/<tenant_id>.json` (its legacy snapshot or tenant
/// descriptor). The directory itself must already exist.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
  #[serde(default = "default_data_dir")]
  pub data_dir: PathBuf,
}

impl Default for RegistryConfig {
  fn default() -> Self { Self { data_dir: default_data_dir() } }
}

impl RegistryConfig {
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    Self { data_dir: data_dir.into() }
  }

  pub fn store_path(&self, tenant_id: TenantId) -> PathBuf {
    self.data_dir.join(format!("{tenant_id}.db"))
  }

  pub fn snapshot_path(&self, tenant_id: TenantId) -> PathBuf {
    self.data_dir.join(format!("{tenant_id}.json"))
  }

  /// The tenant id a snapshot file is named after, if any.
  pub fn tenant_of_snapshot(path: &Path) -> Option<TenantId> {
    if path.extension()? != "json" {
      return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
  }
}
