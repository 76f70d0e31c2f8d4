//! Core types and trait definitions for the Roster player registry.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! (e.g. `roster-store-sqlite`) implement [`store::RosterStore`]; callers
//! depend on the trait and on the plain records defined here.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
#![allow(async_fn_in_trait)]

pub mod entity;
pub mod error;
pub mod filter;
pub mod legacy;
pub mod store;

pub use entity::{Faction, Player, TenantId, User};
pub use error::{Error, Result};
pub use filter::PlayerFilter;
