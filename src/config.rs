//! Configuration Module
//!
//! Handles loading driver configuration from environment variables.

use std::env;
use std::time::Duration;

/// Driver configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Keep one connection per (host, port) instead of reconnecting per call
    pub reuse_connections: bool,
    /// Socket and connect timeout handed to the memcache client, None = client default
    pub timeout: Option<Duration>,
    /// Probe server stats before each get/set
    pub check_server: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SDB_MEMCACHE_REUSE_CONNECTIONS` - Pool connections (default: false)
    /// - `SDB_MEMCACHE_TIMEOUT` - Socket and connect timeout in seconds (default: unset)
    /// - `SDB_MEMCACHE_CHECK_SERVER` - Stats probe before each call (default: false)
    ///
    /// Booleans accept `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`,
    /// case-insensitively; anything else keeps the default.
    pub fn from_env() -> Self {
        Self {
            reuse_connections: env::var("SDB_MEMCACHE_REUSE_CONNECTIONS")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
            timeout: env::var("SDB_MEMCACHE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .map(Duration::from_secs_f64),
            check_server: env::var("SDB_MEMCACHE_CHECK_SERVER")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
