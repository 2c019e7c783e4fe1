//! Configuration for dictclient
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::time::Duration;

use crate::error::{DictError, Result};

/// Default DICT port (RFC 2229 section 3)
pub const DEFAULT_PORT: u16 = 2628;

/// Default host used when none is given
pub const DEFAULT_HOST: &str = "dict.org";

/// Default timeout for connect, read and write (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Identity sent to the server with the CLIENT command
///
/// Built once and handed to whatever performs the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
    pub vendor: String,
}

impl ClientInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            vendor: vendor.into(),
        }
    }

    /// Text sent as the CLIENT parameter
    pub fn client_string(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            vendor: env!("CARGO_PKG_AUTHORS").to_string(),
        }
    }
}

impl fmt::Display for ClientInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.client_string())
    }
}

/// Main configuration for a DICT client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// Server host name or address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Timeout Configuration
    // -------------------------------------------------------------------------
    /// Connect timeout (milliseconds, 0 = no timeout)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, 0 = no timeout)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = no timeout)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Handshake Configuration
    // -------------------------------------------------------------------------
    /// Identity announced with CLIENT after connecting
    pub client: ClientInfo,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_TIMEOUT_MS,
            client: ClientInfo::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config describes something we can connect to
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(DictError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(DictError::Config("port must not be zero".to_string()));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set connect, read and write timeouts at once (in milliseconds)
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self.config.read_timeout_ms = ms;
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the identity sent with CLIENT
    pub fn client(mut self, client: ClientInfo) -> Self {
        self.config.client = client;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
