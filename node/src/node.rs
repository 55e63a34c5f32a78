//! The registry node: loads state, wires the sequencer, persists on stop.

use std::sync::Arc;

use surety_registry::AirlineRegistry;
use surety_types::{Clock, SystemClock};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::metrics::NodeMetrics;
use crate::service::RegistryService;
use crate::shutdown::ShutdownController;
use crate::snapshot_store::SnapshotStore;

/// A running registry node.
pub struct SuretyNode {
    pub config: NodeConfig,
    pub metrics: Arc<NodeMetrics>,
    service: RegistryService,
    shutdown: ShutdownController,
}

impl SuretyNode {
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a node whose registry reads time from `clock`.
    pub fn with_clock(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let store = SnapshotStore::new(config.snapshot_path());

        let mut registry = match store.load()? {
            Some(snapshot) => {
                let registry = AirlineRegistry::restore(snapshot, clock)?;
                tracing::info!(
                    path = %store.path().display(),
                    registered = registry.registered_count(),
                    operational = registry.is_operational(),
                    "registry restored from snapshot"
                );
                if registry.owner() != &config.owner {
                    tracing::warn!(
                        configured = %config.owner,
                        persisted = %registry.owner(),
                        "configured owner differs from snapshot; keeping snapshot owner"
                    );
                }
                registry
            }
            None => {
                tracing::info!(
                    founder = %config.founder,
                    consensus_threshold = config.params.consensus_threshold,
                    quorum_rule = %config.params.quorum_rule,
                    "no snapshot found, initialising registry"
                );
                AirlineRegistry::with_clock(
                    config.owner.clone(),
                    config.founder.clone(),
                    config.params.clone(),
                    clock,
                )
            }
        };

        // The front-end this node serves must be on the allowlist.
        let owner = registry.owner().clone();
        registry.authorize_caller(&config.app_id, &owner)?;
        registry.drain_events();

        let metrics = Arc::new(NodeMetrics::new());
        let store = config.persist_snapshots.then_some(store);
        if let Some(store) = &store {
            store.save(&registry.snapshot())?;
        }
        let service = RegistryService::new(
            registry,
            config.app_id.clone(),
            Arc::clone(&metrics),
            store,
        );

        Ok(Self {
            config,
            metrics,
            service,
            shutdown: ShutdownController::new(),
        })
    }

    /// A handle to the sequenced registry; cheap to clone.
    pub fn service(&self) -> RegistryService {
        self.service.clone()
    }

    pub fn shutdown_controller(&self) -> ShutdownController {
        self.shutdown.clone()
    }

    /// Signal shutdown and write a final snapshot.
    pub async fn stop(&self) -> Result<(), NodeError> {
        tracing::info!("surety node stopping");
        self.shutdown.shutdown();
        self.service.persist().await?;
        tracing::info!("surety node stopped");
        Ok(())
    }
}
