//! Profile Module
//!
//! Named connection profiles and their resolution into effective settings.
//!
//! A profile is a plain option mapping, e.g.
//!
//! ```json
//! { "driver": "memcache", "host": "localhost", "port": 11211, "expire": 60 }
//! ```
//!
//! Resolution only fills in defaults. Malformed values are carried through
//! untouched and rejected later by the connection layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// == Defaults ==
/// Host used when a profile does not name one
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port used when a profile does not name one
pub const DEFAULT_PORT: u16 = 11211;

/// Expiration used when a profile does not name one; 0 never expires
pub const DEFAULT_EXPIRATION: u32 = 0;

// == Profile ==
/// A named configuration record describing how to reach a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    options: Map<String, Value>,
}

impl Profile {
    /// Creates an empty profile; every setting resolves to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, returning the profile for chaining.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    /// Returns the raw option stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Returns the `driver` option when it is a string.
    pub fn driver(&self) -> Option<&str> {
        self.options.get("driver").and_then(Value::as_str)
    }

    // == Resolve ==
    /// Produces the effective host/port/expire settings.
    pub fn resolve(&self) -> Settings {
        Settings {
            host: self
                .options
                .get("host")
                .cloned()
                .unwrap_or_else(|| Value::from(DEFAULT_HOST)),
            port: self
                .options
                .get("port")
                .cloned()
                .unwrap_or_else(|| Value::from(DEFAULT_PORT)),
            expire: self
                .options
                .get("expire")
                .cloned()
                .unwrap_or_else(|| Value::from(DEFAULT_EXPIRATION)),
            timeout: self.options.get("timeout").cloned(),
        }
    }
}

impl From<Map<String, Value>> for Profile {
    fn from(options: Map<String, Value>) -> Self {
        Self { options }
    }
}

/// Resolves an optional profile; a missing profile yields all defaults.
pub fn resolve(profile: Option<&Profile>) -> Settings {
    profile.map(Profile::resolve).unwrap_or_default()
}

// == Settings ==
/// Effective connection settings of one operation.
///
/// Values keep the type they had in the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: Value,
    pub port: Value,
    pub expire: Value,
    /// Socket timeout in seconds, overrides the driver config when set
    pub timeout: Option<Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Profile::new().resolve()
    }
}

// == Profile Source ==
/// Supplies named profiles; how they are stored is up to the implementor.
pub trait ProfileSource {
    /// Returns the profile registered under `name`.
    fn profile(&self, name: &str) -> Option<Profile>;
}

impl ProfileSource for HashMap<String, Profile> {
    fn profile(&self, name: &str) -> Option<Profile> {
        self.get(name).cloned()
    }
}

/// In-memory profile source keyed by profile name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ProfileStore {
    profiles: HashMap<String, Profile>,
}

impl ProfileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object of `name -> profile` entries.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Registers a profile under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, profile: Profile) {
        self.profiles.insert(name.into(), profile);
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileSource for ProfileStore {
    fn profile(&self, name: &str) -> Option<Profile> {
        self.profiles.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_empty_profile_uses_defaults() {
        let settings = Profile::new().resolve();
        assert_eq!(settings.host, json!("127.0.0.1"));
        assert_eq!(settings.port, json!(11211));
        assert_eq!(settings.expire, json!(0));
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn test_resolve_missing_profile_uses_defaults() {
        assert_eq!(resolve(None), Profile::new().resolve());
    }

    #[test]
    fn test_resolve_keeps_explicit_values() {
        let profile = Profile::new()
            .with("driver", "memcache")
            .with("host", "cache.local")
            .with("port", 11311)
            .with("expire", 60);

        let settings = profile.resolve();
        assert_eq!(settings.host, json!("cache.local"));
        assert_eq!(settings.port, json!(11311));
        assert_eq!(settings.expire, json!(60));
        assert_eq!(profile.driver(), Some("memcache"));
    }

    #[test]
    fn test_resolve_does_not_validate() {
        let profile = Profile::new().with("port", "not-a-port");
        assert_eq!(profile.resolve().port, json!("not-a-port"));
    }

    #[test]
    fn test_profile_store_from_json() {
        let store = ProfileStore::from_json(
            r#"{"mymemcache": {"driver": "memcache", "host": "localhost", "port": 11211}}"#,
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        let profile = store.profile("mymemcache").unwrap();
        assert_eq!(profile.get("host"), Some(&json!("localhost")));
        assert!(store.profile("other").is_none());
    }

    #[test]
    fn test_hashmap_source() {
        let mut map = HashMap::new();
        map.insert("p".to_string(), Profile::new().with("driver", "memcache"));
        assert_eq!(map.profile("p").unwrap().driver(), Some("memcache"));
    }
}
