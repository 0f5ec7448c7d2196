//! Memcache sdb driver
//!
//! Resolves a profile, opens a connection through a [`CacheClient`] and
//! issues exactly one get or set. Client errors are returned untouched.
//!
//! A profile for this driver looks like:
//!
//! ```json
//! { "driver": "memcache", "host": "localhost", "port": 11211 }
//! ```
//!
//! and is referenced as `sdb://<profile-name>/<key>`.

use serde_json::Value;
use tracing::{debug, Span};

use crate::client::{ttl_from, CacheClient, Endpoint};
use crate::codec;
use crate::config::Config;
use crate::error::{Result, SdbError};
use crate::profile::{self, Profile, Settings};
use crate::sdb::SdbDriver;

/// Driver name profiles select with `driver: memcache`
pub const DRIVER_NAME: &str = "memcache";

// == Memcache Sdb ==
pub struct MemcacheSdb<C> {
    client: C,
    config: Config,
    span: Span,
}

impl<C: CacheClient> MemcacheSdb<C> {
    /// Creates the driver on top of `client`; `span` scopes its log events.
    pub fn new(client: C, config: Config, span: Span) -> Self {
        Self {
            client,
            config,
            span,
        }
    }

    /// The underlying cache client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn settings(&self, profile: Option<&Profile>) -> Result<Settings> {
        if let Some(found) = profile.and_then(Profile::driver) {
            if found != DRIVER_NAME {
                return Err(SdbError::DriverMismatch {
                    expected: DRIVER_NAME.to_string(),
                    found: found.to_string(),
                });
            }
        }
        Ok(profile::resolve(profile))
    }

    fn connect(&self, settings: &Settings) -> Result<C::Conn> {
        let endpoint = Endpoint::from_settings(settings)?;
        let conn = self.client.connect(&endpoint)?;

        if self.config.check_server && self.client.stats(&conn)?.is_empty() {
            return Err(SdbError::ServerDown);
        }
        Ok(conn)
    }
}

impl<C: CacheClient> SdbDriver for MemcacheSdb<C> {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn set(&self, key: &str, value: &Value, profile: Option<&Profile>) -> Result<bool> {
        let _enter = self.span.enter();
        let settings = self.settings(profile)?;
        let ttl = ttl_from(&settings.expire)?;
        let payload = codec::encode(value)?;

        let conn = self.connect(&settings)?;
        debug!(key, ttl, "memcache set");
        self.client.set(&conn, key, &payload, ttl)
    }

    fn get(&self, key: &str, profile: Option<&Profile>) -> Result<Option<Value>> {
        let _enter = self.span.enter();
        let settings = self.settings(profile)?;

        let conn = self.connect(&settings)?;
        let raw = self.client.get(&conn, key)?;
        debug!(key, found = raw.is_some(), "memcache get");
        Ok(raw.as_deref().map(codec::decode))
    }
}

// == Load ==
/// Loads the driver if the memcache client library was compiled in.
#[cfg(feature = "memcache")]
pub fn load(config: &Config, span: Span) -> Result<Box<dyn SdbDriver>> {
    let client = crate::client::MemcacheClient::new(config.clone(), span.clone());
    Ok(Box::new(MemcacheSdb::new(client, config.clone(), span)))
}

/// Loads the driver if the memcache client library was compiled in.
#[cfg(not(feature = "memcache"))]
pub fn load(_config: &Config, _span: Span) -> Result<Box<dyn SdbDriver>> {
    Err(SdbError::Unavailable(DRIVER_NAME.to_string()))
}
