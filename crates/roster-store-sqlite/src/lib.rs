//! SQLite backend for the Roster player registry.
//!
//! Each tenant gets its own SQLite file, opened through [`tokio_rusqlite`] so
//! all database access runs on a dedicated thread without blocking the async
//! runtime. [`Registry`] hands out one [`TenantStore`] per tenant, creating
//! or migrating the store the first time a tenant is referenced.

mod encode;
mod finder;
mod migrate;
mod repo;
mod schema;
mod store;

pub mod config;
pub mod error;
pub mod registry;

pub use config::RegistryConfig;
pub use error::{Error, Result};
pub use migrate::open_tenant;
pub use registry::Registry;
pub use store::TenantStore;
