//! Sdb URI parsing
//!
//! `sdb://<profile>/<key>`; the key may itself contain slashes.

use std::fmt;
use std::str::FromStr;

use crate::error::SdbError;

/// URI scheme prefix
pub const SCHEME: &str = "sdb://";

// == Sdb Uri ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdbUri {
    pub profile: String,
    pub key: String,
}

impl SdbUri {
    /// Parses `sdb://<profile>/<key>`.
    pub fn parse(raw: &str) -> Result<Self, SdbError> {
        let invalid = || SdbError::InvalidUri(raw.to_string());

        if !Self::is_sdb_uri(raw) {
            return Err(invalid());
        }
        let rest = &raw[SCHEME.len()..];
        let (profile, key) = rest.split_once('/').ok_or_else(invalid)?;
        if profile.is_empty() || key.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            profile: profile.to_string(),
            key: key.to_string(),
        })
    }

    /// Returns true if `raw` looks like an sdb URI at all.
    pub fn is_sdb_uri(raw: &str) -> bool {
        raw.starts_with(SCHEME)
    }
}

impl FromStr for SdbUri {
    type Err = SdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SdbUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", SCHEME, self.profile, self.key)
    }
}
