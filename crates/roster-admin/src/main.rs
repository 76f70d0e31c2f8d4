//! `roster-admin` — operator tool for the Roster tenant stores.
//!
//! Reads `roster.toml` (or the path given with `--config`) layered under
//! `ROSTER_*` environment variables, then either preloads every tenant found
//! in the data directory (running pending legacy migrations) or dumps one
//! tenant's records as JSON.
//!
//! ```
//! roster-admin preload
//! roster-admin --data-dir /srv/roster dump 412345678901234567 --faction Red
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use roster_core::{PlayerFilter, TenantId, store::RosterStore};
use roster_store_sqlite::{Registry, RegistryConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster tenant store maintenance")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "roster.toml")]
  config: PathBuf,

  /// Directory holding `<tenant>.db` and `<tenant>.json` files; overrides
  /// the configuration file.
  #[arg(long, env = "ROSTER_DATA_DIR")]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Open every tenant with a snapshot in the data directory, migrating
  /// legacy snapshots that have no relational store yet.
  Preload,

  /// Print one tenant's players as JSON.
  Dump {
    tenant: TenantId,

    /// Only players whose current faction has this name.
    #[arg(long)]
    faction: Option<String>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    game_id: Option<String>,
  },

  /// Print one tenant's factions as JSON.
  Factions { tenant: TenantId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("ROSTER"))
    .build()
    .context("failed to read config file")?;

  let mut registry_cfg: RegistryConfig = settings
    .try_deserialize()
    .context("failed to deserialise RegistryConfig")?;
  if let Some(dir) = cli.data_dir {
    registry_cfg.data_dir = dir;
  }

  std::fs::create_dir_all(&registry_cfg.data_dir).with_context(|| {
    format!("failed to create data directory {:?}", registry_cfg.data_dir)
  })?;

  let registry = Registry::new(registry_cfg);

  match cli.command {
    Command::Preload => {
      let count = registry.preload().await.context("preload failed")?;
      for tenant in registry.tenants().await {
        if let Some(store) = registry.get(tenant).await {
          let players = store
            .find_players(&PlayerFilter::default())
            .await
            .with_context(|| format!("failed to list players of tenant {tenant}"))?;
          tracing::info!(
            tenant,
            name = store.tenant_name(),
            players = players.len(),
            factions = store.factions().len(),
            "tenant ready"
          );
        }
      }
      tracing::info!("{count} tenant(s) loaded");
    }

    Command::Dump { tenant, faction, name, game_id } => {
      let store = open_existing(&registry, tenant).await?;

      let mut filter = PlayerFilter { name, game_id, ..PlayerFilter::default() };
      if let Some(label) = faction {
        let found = store
          .find_faction(&label)
          .with_context(|| format!("faction {label:?} not found"))?;
        filter = filter.faction(&found);
      }

      if filter.is_empty() {
        tracing::info!(tenant, "no filter given; dumping every player");
      }
      let players = store
        .find_players(&filter)
        .await
        .context("player lookup failed")?;
      println!("{}", serde_json::to_string_pretty(&players)?);
    }

    Command::Factions { tenant } => {
      let store = open_existing(&registry, tenant).await?;
      println!("{}", serde_json::to_string_pretty(&store.factions())?);
    }
  }

  Ok(())
}

/// Resolve a tenant that already has files on disk. Read-only commands must
/// not provision new tenants as a side effect.
async fn open_existing(
  registry: &Registry,
  tenant: TenantId,
) -> anyhow::Result<roster_store_sqlite::TenantStore> {
  let cfg = registry.config();
  anyhow::ensure!(
    cfg.store_path(tenant).exists() || cfg.snapshot_path(tenant).exists(),
    "no store or snapshot for tenant {tenant} in {:?}",
    cfg.data_dir
  );
  registry
    .resolve(tenant, "")
    .await
    .with_context(|| format!("failed to open tenant {tenant}"))
}
