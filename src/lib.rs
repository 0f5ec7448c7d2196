//! Sdb Memcache - memcache backend for `sdb://` lookups
//!
//! Resolves a named connection profile, connects to a memcache server and
//! performs a single get or set keyed by a string.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod profile;
pub mod sdb;

pub use client::{CacheClient, Endpoint, InMemoryClient};
pub use config::Config;
pub use error::{Result, SdbError};
pub use profile::{Profile, ProfileSource, ProfileStore};
pub use sdb::{MemcacheSdb, SdbDriver, SdbRegistry, SdbUri};

#[cfg(feature = "memcache")]
pub use client::MemcacheClient;
