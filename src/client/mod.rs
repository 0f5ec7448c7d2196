//! Client Module
//!
//! The cache client capability the sdb driver talks through, plus the
//! connection-layer validation of profile settings.

#[cfg(feature = "memcache")]
mod memcached;
mod memory;

#[cfg(feature = "memcache")]
pub use memcached::MemcacheClient;
pub use memory::{InMemoryClient, MemoryConn};

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::error::{Result, SdbError};
use crate::profile::Settings;

/// Per-server statistics as reported by `stats`, keyed by server address.
pub type ServerStats = Vec<(String, HashMap<String, String>)>;

// == Cache Client ==
/// A memcache client library.
///
/// Implementations report their own failures through
/// [`SdbError::Connection`] and [`SdbError::Client`] without rewording them.
pub trait CacheClient: Send + Sync {
    /// Open channel to one server.
    type Conn;

    /// Opens a connection to the server at `endpoint`.
    fn connect(&self, endpoint: &Endpoint) -> Result<Self::Conn>;

    /// Stores `value` under `key` with a time-to-live in seconds.
    fn set(&self, conn: &Self::Conn, key: &str, value: &[u8], ttl: u32) -> Result<bool>;

    /// Fetches the value under `key`, `None` when absent.
    fn get(&self, conn: &Self::Conn, key: &str) -> Result<Option<Vec<u8>>>;

    /// Queries server statistics.
    fn stats(&self, conn: &Self::Conn) -> Result<ServerStats>;
}

// == Endpoint ==
/// Validated address of one memcache server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub timeout: Option<Duration>,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: None,
        }
    }

    /// Validates resolved settings into an endpoint.
    ///
    /// Ports may be given as integers or digit strings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let host = settings
            .host
            .as_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| SdbError::InvalidHost(settings.host.to_string()))?
            .to_string();

        let port = match &settings.port {
            Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse::<u16>().ok()
            }
            _ => None,
        }
        .filter(|p| *p != 0)
        .ok_or_else(|| SdbError::InvalidPort(settings.port.to_string()))?;

        // Unusable timeouts fall back to the client default
        let timeout = settings
            .timeout
            .as_ref()
            .and_then(Value::as_f64)
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64);

        Ok(Self {
            host,
            port,
            timeout,
        })
    }

    /// Returns `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Validates the resolved `expire` setting into a TTL in seconds.
pub fn ttl_from(expire: &Value) -> Result<u32> {
    expire
        .as_u64()
        .and_then(|secs| u32::try_from(secs).ok())
        .ok_or_else(|| SdbError::InvalidExpire(expire.to_string()))
}
