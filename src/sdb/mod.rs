//! Sdb Module
//!
//! The simple-database abstraction: drivers keyed by name, a registry that
//! only holds the drivers whose client library is present, and `sdb://`
//! URI dispatch.

pub mod memcache;
mod uri;


pub use self::memcache::MemcacheSdb;
pub use self::uri::SdbUri;

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn, Span};

use crate::config::Config;
use crate::error::{Result, SdbError};
use crate::profile::{Profile, ProfileSource};

// == Sdb Driver ==
/// A backend reachable through `sdb://` URIs.
pub trait SdbDriver: Send + Sync {
    /// Name profiles select the driver by.
    fn name(&self) -> &'static str;

    /// Stores `value` under `key`; the result is the client's own status.
    fn set(&self, key: &str, value: &Value, profile: Option<&Profile>) -> Result<bool>;

    /// Fetches the value under `key`; `None` when the key is absent.
    fn get(&self, key: &str, profile: Option<&Profile>) -> Result<Option<Value>>;
}

/// Loader of one driver, failing with [`SdbError::Unavailable`].
pub type Loader = fn(&Config, Span) -> Result<Box<dyn SdbDriver>>;

/// Every driver this crate knows how to load.
pub const LOADERS: &[(&str, Loader)] = &[(memcache::DRIVER_NAME, memcache::load)];

// == Registry ==
/// Loaded drivers by name.
pub struct SdbRegistry {
    drivers: HashMap<&'static str, Box<dyn SdbDriver>>,
    span: Span,
}

impl SdbRegistry {
    /// Creates an empty registry.
    pub fn new(span: Span) -> Self {
        Self {
            drivers: HashMap::new(),
            span,
        }
    }

    /// Runs every known loader once and keeps the drivers that load.
    pub fn with_default_drivers(config: &Config, span: Span) -> Self {
        let mut registry = Self::new(span);
        for (name, loader) in LOADERS {
            match loader(config, registry.span.clone()) {
                Ok(driver) => registry.register(driver),
                Err(err) => {
                    let _enter = registry.span.enter();
                    warn!(driver = *name, error = %err, "sdb driver not loaded");
                }
            }
        }
        registry
    }

    /// Adds a driver, replacing any driver of the same name.
    pub fn register(&mut self, driver: Box<dyn SdbDriver>) {
        let _enter = self.span.enter();
        debug!(driver = driver.name(), "sdb driver loaded");
        self.drivers.insert(driver.name(), driver);
    }

    /// Returns true if a driver named `name` is usable.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Returns the driver named `name`.
    pub fn driver(&self, name: &str) -> Result<&dyn SdbDriver> {
        self.drivers
            .get(name)
            .map(|driver| driver.as_ref())
            .ok_or_else(|| SdbError::Unavailable(name.to_string()))
    }

    /// Resolves `sdb://<profile>/<key>` to the stored value.
    pub fn get_uri(&self, uri: &str, source: &dyn ProfileSource) -> Result<Option<Value>> {
        let (uri, profile) = self.lookup(uri, source)?;
        self.driver_for(&uri, &profile)?.get(&uri.key, Some(&profile))
    }

    /// Stores `value` at `sdb://<profile>/<key>`.
    pub fn set_uri(&self, uri: &str, value: &Value, source: &dyn ProfileSource) -> Result<bool> {
        let (uri, profile) = self.lookup(uri, source)?;
        self.driver_for(&uri, &profile)?.set(&uri.key, value, Some(&profile))
    }

    fn lookup(&self, raw: &str, source: &dyn ProfileSource) -> Result<(SdbUri, Profile)> {
        let uri = SdbUri::parse(raw)?;
        let profile = source
            .profile(&uri.profile)
            .ok_or_else(|| SdbError::ProfileNotFound(uri.profile.clone()))?;
        Ok((uri, profile))
    }

    fn driver_for(&self, uri: &SdbUri, profile: &Profile) -> Result<&dyn SdbDriver> {
        let name = profile
            .driver()
            .ok_or_else(|| SdbError::MissingDriver(uri.profile.clone()))?;
        self.driver(name)
    }
}
