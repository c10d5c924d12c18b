//! # space-cache
//!
//! Backends for the freshness store:
//!
//! - **memory**: bounded in-process map on [moka](https://crates.io/crates/moka),
//!   gone on restart.
//! - **redis**: shared across instances and restarts.
//!
//! [`CacheManager`] picks one from configuration and adds JSON helpers.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
