//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use surety_types::{AccountAddress, RegistryParams};

use crate::NodeError;

/// Configuration for a surety registry node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Directory holding the registry snapshot.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Identity allowed to flip the operational switch and edit the allowlist.
    /// Only used when no snapshot exists yet.
    #[serde(default = "default_owner")]
    pub owner: AccountAddress,

    /// Airline registered at initialisation. Only used when no snapshot exists yet.
    #[serde(default = "default_founder")]
    pub founder: AccountAddress,

    /// Identity this node's front-end uses on the registry's caller allowlist.
    #[serde(default = "default_app_id")]
    pub app_id: AccountAddress,

    /// Whether to enable the RPC server.
    #[serde(default = "default_true")]
    pub enable_rpc: bool,

    /// RPC port (if enabled).
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Whether to serve Prometheus metrics at `/metrics`.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Write a snapshot to `data_dir` after every committed change.
    #[serde(default = "default_true")]
    pub persist_snapshots: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Admission and funding parameters. Only used when no snapshot exists yet.
    #[serde(default)]
    pub params: RegistryParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./surety_data")
}

fn default_owner() -> AccountAddress {
    AccountAddress::new("owner")
}

fn default_founder() -> AccountAddress {
    AccountAddress::new("founder")
}

fn default_app_id() -> AccountAddress {
    AccountAddress::new("surety-rpc")
}

fn default_true() -> bool {
    true
}

fn default_rpc_port() -> u16 {
    7070
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Where the registry snapshot lives.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join("registry.snapshot")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            owner: default_owner(),
            founder: default_founder(),
            app_id: default_app_id(),
            enable_rpc: default_true(),
            rpc_port: default_rpc_port(),
            enable_metrics: false,
            persist_snapshots: default_true(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            params: RegistryParams::default(),
        }
    }
}
