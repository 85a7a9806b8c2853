//! Daemon configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The chain list itself lives in a JSON
//! file referenced by `CHAINS_FILE`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::ChainConfig;
use crate::transport::TransportTuning;

type ConfigError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level daemon configuration.
///
/// Loaded once at startup via [`HubConfig::from_env`].
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Socket address to bind the status API to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Path to the JSON file listing managed chains.
    pub chains_file: PathBuf,

    /// First reconnect delay after a drop, in seconds.
    pub reconnect_base_secs: u64,

    /// Ceiling for the exponential reconnect backoff, in seconds.
    pub reconnect_cap_secs: u64,

    /// Deadline for a single request/response exchange, in seconds.
    pub request_timeout_secs: u64,

    /// Capacity of the lifecycle broadcast channel.
    pub lifecycle_bus_capacity: usize,
}

impl HubConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let chains_file =
            PathBuf::from(std::env::var("CHAINS_FILE").unwrap_or_else(|_| "chains.json".to_string()));

        let reconnect_base_secs = parse_env("RECONNECT_BASE_SECS", 1);
        let reconnect_cap_secs = parse_env("RECONNECT_CAP_SECS", 30);
        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30);
        let lifecycle_bus_capacity = parse_env("LIFECYCLE_BUS_CAPACITY", 16);

        Ok(Self {
            listen_addr,
            chains_file,
            reconnect_base_secs,
            reconnect_cap_secs,
            request_timeout_secs,
            lifecycle_bus_capacity,
        })
    }

    /// Transport timing knobs derived from this configuration.
    #[must_use]
    pub const fn transport_tuning(&self) -> TransportTuning {
        TransportTuning {
            reconnect_base: Duration::from_secs(self.reconnect_base_secs),
            reconnect_cap: Duration::from_secs(self.reconnect_cap_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Loads the managed chain list from a JSON file.
///
/// # Errors
///
/// Returns an error when the file cannot be read or does not deserialize
/// into a list of chain configurations.
pub fn load_chains(path: &Path) -> Result<Vec<ChainConfig>, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let chains: Vec<ChainConfig> = serde_json::from_str(&raw)?;
    if chains.is_empty() {
        tracing::warn!(path = %path.display(), "chains file lists no chains");
    }
    Ok(chains)
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
