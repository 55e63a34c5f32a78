//! Surety registry node: hosts the airline registry behind a single sequencer.
//!
//! The node:
//! - Loads configuration and the last registry snapshot
//! - Authorizes its own front-end on the registry's caller allowlist
//! - Serializes every registry call through one lock
//! - Persists a snapshot after each committed change
//! - Publishes Prometheus metrics and structured logs for registry events

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod service;
pub mod shutdown;
pub mod snapshot_store;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::SuretyNode;
pub use service::{AirlineStatus, ProposalView, RegistryService, RegistryStatus};
pub use shutdown::ShutdownController;
pub use snapshot_store::SnapshotStore;
