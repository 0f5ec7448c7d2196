//! In-Memory Client
//!
//! A process-local stand-in for a memcache server. Every endpoint gets its
//! own keyspace. Connect and exchange failures can be injected so callers
//! can observe how errors travel.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::{CacheClient, Endpoint, ServerStats};
use crate::error::{Result, SdbError};

// == Stored Entry ==
#[derive(Debug, Clone)]
struct StoredEntry {
    value: Vec<u8>,
    ttl: u32,
}

// == Server Counters ==
/// Counters reported through `stats`, named after memcached's own.
#[derive(Debug, Clone, Default)]
struct Counters {
    get_hits: u64,
    get_misses: u64,
    cmd_set: u64,
    total_connections: u64,
}

#[derive(Debug, Default)]
struct Server {
    entries: HashMap<String, StoredEntry>,
    counters: Counters,
}

#[derive(Debug, Default)]
struct Shared {
    servers: HashMap<String, Server>,
    refuse_connect: Option<String>,
    fail_exchange: Option<String>,
    stats_empty: bool,
}

// == In-Memory Client ==
/// Cloneable handle; clones share the same servers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClient {
    shared: Arc<Mutex<Shared>>,
}

/// Connection handle of [`InMemoryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryConn {
    address: String,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `connect` fail with `ConnectionRefused`.
    pub fn refuse_connections(&self, message: &str) {
        self.lock().refuse_connect = Some(message.to_string());
    }

    /// Makes every following get/set/stats fail with `TimedOut`.
    pub fn fail_exchanges(&self, message: &str) {
        self.lock().fail_exchange = Some(message.to_string());
    }

    /// Makes `stats` report no servers, as a dead server does.
    pub fn report_no_stats(&self) {
        self.lock().stats_empty = true;
    }

    /// Clears injected failures.
    pub fn heal(&self) {
        let mut shared = self.lock();
        shared.refuse_connect = None;
        shared.fail_exchange = None;
        shared.stats_empty = false;
    }

    /// TTL the entry under `key` was stored with on `endpoint`.
    pub fn ttl_of(&self, endpoint: &Endpoint, key: &str) -> Option<u32> {
        self.lock()
            .servers
            .get(&endpoint.address())
            .and_then(|server| server.entries.get(key))
            .map(|entry| entry.ttl)
    }

    /// Number of connections opened to `endpoint` so far.
    pub fn connections_to(&self, endpoint: &Endpoint) -> u64 {
        self.lock()
            .servers
            .get(&endpoint.address())
            .map_or(0, |server| server.counters.total_connections)
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        // A panic while holding the lock leaves plain data behind
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn exchange<T>(&self, conn: &MemoryConn, op: impl FnOnce(&mut Server) -> T) -> Result<T> {
        let mut shared = self.lock();
        if let Some(message) = &shared.fail_exchange {
            return Err(SdbError::client(io::Error::new(
                io::ErrorKind::TimedOut,
                message.clone(),
            )));
        }
        let server = shared.servers.entry(conn.address.clone()).or_default();
        Ok(op(server))
    }
}

impl CacheClient for InMemoryClient {
    type Conn = MemoryConn;

    fn connect(&self, endpoint: &Endpoint) -> Result<MemoryConn> {
        let mut shared = self.lock();
        if let Some(message) = &shared.refuse_connect {
            return Err(SdbError::connection(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                message.clone(),
            )));
        }

        let address = endpoint.address();
        let server = shared.servers.entry(address.clone()).or_default();
        server.counters.total_connections += 1;
        Ok(MemoryConn { address })
    }

    fn set(&self, conn: &MemoryConn, key: &str, value: &[u8], ttl: u32) -> Result<bool> {
        self.exchange(conn, |server| {
            server.entries.insert(
                key.to_string(),
                StoredEntry {
                    value: value.to_vec(),
                    ttl,
                },
            );
            server.counters.cmd_set += 1;
            true
        })
    }

    fn get(&self, conn: &MemoryConn, key: &str) -> Result<Option<Vec<u8>>> {
        self.exchange(conn, |server| match server.entries.get(key) {
            Some(entry) => {
                server.counters.get_hits += 1;
                Some(entry.value.clone())
            }
            None => {
                server.counters.get_misses += 1;
                None
            }
        })
    }

    fn stats(&self, conn: &MemoryConn) -> Result<ServerStats> {
        let empty = self.lock().stats_empty;
        let stats = self.exchange(conn, |server| {
            let counters = &server.counters;
            let mut stats = HashMap::new();
            stats.insert("get_hits".to_string(), counters.get_hits.to_string());
            stats.insert("get_misses".to_string(), counters.get_misses.to_string());
            stats.insert("cmd_set".to_string(), counters.cmd_set.to_string());
            stats.insert(
                "total_connections".to_string(),
                counters.total_connections.to_string(),
            );
            stats.insert("curr_items".to_string(), server.entries.len().to_string());
            stats
        })?;

        if empty {
            return Ok(Vec::new());
        }
        Ok(vec![(conn.address.clone(), stats)])
    }
}
