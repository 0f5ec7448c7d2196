//! Memcached Client
//!
//! [`CacheClient`] backed by the `memcache` crate, speaking the ASCII
//! protocol to a single server per connection.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, Span};

use crate::client::{CacheClient, Endpoint, ServerStats};
use crate::config::Config;
use crate::error::{Result, SdbError};

// == Memcache Client ==
/// Cache client talking to real memcached servers.
pub struct MemcacheClient {
    config: Config,
    /// Open clients per endpoint, only filled when reuse is enabled
    pool: Mutex<HashMap<Endpoint, memcache::Client>>,
    span: Span,
}

impl MemcacheClient {
    /// Creates a client; `span` scopes its connection log events.
    pub fn new(config: Config, span: Span) -> Self {
        Self {
            config,
            pool: Mutex::new(HashMap::new()),
            span,
        }
    }

    /// Builds the connection URL understood by the `memcache` crate.
    ///
    /// The timeout bounds both socket reads/writes and the wait for a
    /// connection.
    fn url(&self, endpoint: &Endpoint) -> String {
        let host = if endpoint.host.contains(':') {
            format!("[{}]", endpoint.host)
        } else {
            endpoint.host.clone()
        };
        let mut url = format!("memcache://{}:{}?protocol=ascii", host, endpoint.port);
        if let Some(timeout) = endpoint.timeout.or(self.config.timeout) {
            let secs = timeout.as_secs_f64();
            url.push_str(&format!("&timeout={}&connect_timeout={}", secs, secs));
        }
        url
    }

    fn open(&self, endpoint: &Endpoint) -> Result<memcache::Client> {
        debug!(address = %endpoint.address(), "connecting to memcached");
        memcache::Client::connect(self.url(endpoint)).map_err(SdbError::connection)
    }
}

impl CacheClient for MemcacheClient {
    type Conn = memcache::Client;

    fn connect(&self, endpoint: &Endpoint) -> Result<memcache::Client> {
        let _enter = self.span.enter();
        if !self.config.reuse_connections {
            return self.open(endpoint);
        }

        let mut pool = self.pool.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(conn) = pool.get(endpoint) {
            debug!(address = %endpoint.address(), "reusing memcached connection");
            return Ok(conn.clone());
        }
        let conn = self.open(endpoint)?;
        pool.insert(endpoint.clone(), conn.clone());
        Ok(conn)
    }

    fn set(&self, conn: &memcache::Client, key: &str, value: &[u8], ttl: u32) -> Result<bool> {
        conn.set(key, value, ttl).map_err(SdbError::client)?;
        Ok(true)
    }

    fn get(&self, conn: &memcache::Client, key: &str) -> Result<Option<Vec<u8>>> {
        conn.get::<Vec<u8>>(key).map_err(SdbError::client)
    }

    fn stats(&self, conn: &memcache::Client) -> Result<ServerStats> {
        let stats = conn.stats().map_err(SdbError::client)?;
        Ok(stats
            .into_iter()
            .map(|(server, values)| (server, values.into_iter().collect()))
            .collect())
    }
}
