//! Configuration management for Doorman.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::throttle::ThrottlePolicy;

/// Main configuration for the Doorman service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoormanConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Throttle configuration
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

impl Default for DoormanConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            throttle: ThrottleConfig::default(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// gRPC server address
    #[serde(default = "default_grpc_addr")]
    pub grpc_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            grpc_addr: default_grpc_addr(),
        }
    }
}

fn default_grpc_addr() -> SocketAddr {
    "127.0.0.1:8081".parse().unwrap()
}

/// Throttle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Attempts allowed within the window before blocking
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Sliding window length in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Block duration in milliseconds
    #[serde(default = "default_block_duration_ms")]
    pub block_duration_ms: u64,

    /// Interval between housekeeping sweeps in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_ms: default_window_ms(),
            block_duration_ms: default_block_duration_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_window_ms() -> u64 {
    15 * 60 * 1000
}

fn default_block_duration_ms() -> u64 {
    15 * 60 * 1000
}

fn default_sweep_interval_secs() -> u64 {
    5 * 60
}

impl ThrottleConfig {
    /// Build the validated policy these settings describe.
    ///
    /// Invalid values (zero attempts, zero durations) are rejected here, at
    /// startup, rather than surfacing per-call.
    pub fn policy(&self) -> crate::error::Result<ThrottlePolicy> {
        ThrottlePolicy::new(
            self.max_attempts,
            Duration::from_millis(self.window_ms),
            Duration::from_millis(self.block_duration_ms),
        )
    }

    /// Interval between housekeeping sweeps.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl DoormanConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: DoormanConfig = serde_yaml::from_str(&contents)
            .map_err(|e| crate::error::DoormanError::Config(e.to_string()))?;
        Ok(config)
    }
}
