//! Error types for the sdb memcache driver
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

/// Boxed error produced by a cache client implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Sdb Error Enum ==
/// Unified error type for sdb lookups.
#[derive(Error, Debug)]
pub enum SdbError {
    /// Driver is not compiled in or failed its load check
    #[error("sdb driver '{0}' is not available")]
    Unavailable(String),

    /// No profile registered under this name
    #[error("sdb profile not found: {0}")]
    ProfileNotFound(String),

    /// Profile does not name a driver
    #[error("sdb profile '{0}' has no driver")]
    MissingDriver(String),

    /// Profile targets a different driver
    #[error("profile is configured for driver '{found}', expected '{expected}'")]
    DriverMismatch { expected: String, found: String },

    /// URI is not of the form sdb://<profile>/<key>
    #[error("invalid sdb uri: {0}")]
    InvalidUri(String),

    /// Host option is not a string
    #[error("host must be a string, got {0}")]
    InvalidHost(String),

    /// Port option is not an integer port number
    #[error("port must be an integer, got {0}")]
    InvalidPort(String),

    /// Expire option is not a non-negative integer
    #[error("'time' must be an integer, got {0}")]
    InvalidExpire(String),

    /// Server answered the stats probe with nothing
    #[error("memcached server is down or does not exist")]
    ServerDown,

    /// Failure while connecting, passed through from the client
    #[error(transparent)]
    Connection(BoxError),

    /// Failure during a get/set exchange, passed through from the client
    #[error(transparent)]
    Client(BoxError),

    /// Value could not be encoded for storage
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SdbError {
    /// Wraps a client error raised while opening a connection.
    pub fn connection<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        SdbError::Connection(err.into())
    }

    /// Wraps a client error raised during a get/set exchange.
    pub fn client<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        SdbError::Client(err.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for sdb operations.
pub type Result<T> = std::result::Result<T, SdbError>;
