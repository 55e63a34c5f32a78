//! The single sequencer in front of the airline registry.
//!
//! Every call takes the registry lock, runs one atomic registry method, then
//! (still under the lock) drains the emitted events into metrics, refreshes
//! gauges and persists a snapshot. Readers therefore only ever observe
//! committed states, and calls are applied in lock-acquisition order.
//!
//! Snapshot writes run on the blocking pool while the lock is held, so files
//! land in commit order without stalling a runtime worker.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, warn};

use surety_registry::{
    AdmissionMode, AdmissionOutcome, AirlineRegistry, FundingReceipt, RegistrationProposal,
    RegistryError, RegistryEvent, RegistrySnapshot,
};
use surety_types::{AccountAddress, FundAmount, QuorumRule, Timestamp};

use crate::metrics::NodeMetrics;
use crate::snapshot_store::SnapshotStore;
use crate::NodeError;

/// Public view of one airline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AirlineStatus {
    pub address: AccountAddress,
    pub registered: bool,
    pub funded: bool,
    #[serde(with = "surety_types::amount::decimal")]
    pub contributed: FundAmount,
    /// Votes collected so far if the airline is a pending candidate.
    pub pending_votes: u64,
    pub registered_at: Option<Timestamp>,
    pub funded_at: Option<Timestamp>,
}

/// Registry-wide summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistryStatus {
    pub operational: bool,
    pub owner: AccountAddress,
    pub founder: AccountAddress,
    pub registered_count: u64,
    pub admission_mode: AdmissionMode,
    pub current_quorum: u64,
    pub consensus_threshold: u64,
    pub quorum_rule: QuorumRule,
    #[serde(with = "surety_types::amount::decimal")]
    pub min_funding: FundAmount,
    #[serde(with = "surety_types::amount::decimal")]
    pub total_escrowed: FundAmount,
    pub pending_proposals: usize,
}

/// A candidate awaiting quorum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposalView {
    pub candidate: AccountAddress,
    pub votes: u64,
    pub quorum: u64,
    pub sponsors: Vec<AccountAddress>,
    pub created_at: Timestamp,
    /// Opening order; later proposals have larger values.
    pub sequence: u64,
}

impl ProposalView {
    fn new(proposal: &RegistrationProposal, quorum: u64) -> Self {
        Self {
            candidate: proposal.candidate.clone(),
            votes: proposal.vote_count(),
            quorum,
            sponsors: proposal.sponsor_votes.iter().cloned().collect(),
            created_at: proposal.created_at,
            sequence: proposal.sequence,
        }
    }
}

#[derive(Clone)]
pub struct RegistryService {
    registry: Arc<Mutex<AirlineRegistry>>,
    /// Identity this service presents on the registry's caller allowlist.
    app_id: AccountAddress,
    metrics: Arc<NodeMetrics>,
    store: Option<Arc<SnapshotStore>>,
}

impl RegistryService {
    pub fn new(
        registry: AirlineRegistry,
        app_id: AccountAddress,
        metrics: Arc<NodeMetrics>,
        store: Option<SnapshotStore>,
    ) -> Self {
        metrics.sync_gauges(&registry);
        Self {
            registry: Arc::new(Mutex::new(registry)),
            app_id,
            metrics,
            store: store.map(Arc::new),
        }
    }

    pub fn app_id(&self) -> &AccountAddress {
        &self.app_id
    }

    pub fn metrics(&self) -> &Arc<NodeMetrics> {
        &self.metrics
    }

    /// Run one registry operation as an atomic, sequenced step.
    async fn commit<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut AirlineRegistry) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut registry = self.registry.lock().await;
        match f(&mut *registry) {
            Ok(value) => {
                let events = registry.drain_events();
                if !events.is_empty() {
                    self.apply_events(&*registry, &events);
                    self.save_committed(registry.snapshot()).await;
                }
                Ok(value)
            }
            Err(e) => {
                warn!(op, kind = e.kind(), error = %e, "registry call rejected");
                self.metrics.observe_rejection(e.kind());
                Err(e)
            }
        }
    }

    fn apply_events(&self, registry: &AirlineRegistry, events: &[RegistryEvent]) {
        for event in events {
            self.metrics.observe_event(event);
        }
        self.metrics.sync_gauges(registry);
    }

    /// Already committed in memory; the next save supersedes a failed one.
    async fn save_committed(&self, snapshot: RegistrySnapshot) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = save_blocking(store, snapshot).await {
            error!(error = %e, path = %store.path().display(), "failed to persist registry snapshot");
        }
    }

    /// Write the current state to the snapshot store, if one is configured.
    pub async fn persist(&self) -> Result<(), NodeError> {
        let registry = self.registry.lock().await;
        match &self.store {
            Some(store) => save_blocking(store, registry.snapshot()).await,
            None => Ok(()),
        }
    }

    // ── Access gate ────────────────────────────────────────────────────

    pub async fn is_operational(&self) -> bool {
        self.registry.lock().await.is_operational()
    }

    pub async fn set_operating_status(
        &self,
        operational: bool,
        caller: &AccountAddress,
    ) -> Result<(), RegistryError> {
        self.commit("set_operating_status", |r| {
            r.set_operating_status(operational, caller)
        })
        .await
    }

    pub async fn authorize_caller(
        &self,
        app: &AccountAddress,
        caller: &AccountAddress,
    ) -> Result<(), RegistryError> {
        self.commit("authorize_caller", |r| r.authorize_caller(app, caller))
            .await
    }

    pub async fn deauthorize_caller(
        &self,
        app: &AccountAddress,
        caller: &AccountAddress,
    ) -> Result<(), RegistryError> {
        self.commit("deauthorize_caller", |r| r.deauthorize_caller(app, caller))
            .await
    }

    pub async fn is_caller_authorized(&self, app: &AccountAddress) -> bool {
        self.registry.lock().await.is_caller_authorized(app)
    }

    // ── Funding ────────────────────────────────────────────────────────

    pub async fn fund(
        &self,
        airline: &AccountAddress,
        amount: FundAmount,
    ) -> Result<FundingReceipt, RegistryError> {
        let app = &self.app_id;
        self.commit("fund", |r| {
            r.require_authorized_caller(app)?;
            r.fund(airline, amount)
        })
        .await
    }

    pub async fn total_escrowed(&self) -> FundAmount {
        self.registry.lock().await.total_escrowed()
    }

    // ── Admission ──────────────────────────────────────────────────────

    pub async fn register_candidate(
        &self,
        candidate: &AccountAddress,
        sponsor: &AccountAddress,
    ) -> Result<AdmissionOutcome, RegistryError> {
        let app = &self.app_id;
        self.commit("register_candidate", |r| {
            r.require_authorized_caller(app)?;
            r.register_candidate(candidate, sponsor)
        })
        .await
    }

    pub async fn registered_count(&self) -> u64 {
        self.registry.lock().await.registered_count()
    }

    /// Status of `airline`; unknown airlines report all-false.
    pub async fn airline(&self, airline: &AccountAddress) -> AirlineStatus {
        let registry = self.registry.lock().await;
        let participant = registry.participant(airline);
        AirlineStatus {
            address: airline.clone(),
            registered: registry.is_registered(airline),
            funded: registry.is_funded(airline),
            contributed: registry.contributed_balance(airline),
            pending_votes: registry.vote_count(airline),
            registered_at: participant.and_then(|p| p.registered_at),
            funded_at: participant.and_then(|p| p.funded_at),
        }
    }

    /// Open proposals, oldest first, with the quorum they currently need.
    pub async fn pending_proposals(&self) -> Vec<ProposalView> {
        let registry = self.registry.lock().await;
        let quorum = registry.current_quorum();
        registry
            .pending_proposals()
            .into_iter()
            .map(|p| ProposalView::new(p, quorum))
            .collect()
    }

    pub async fn registry_status(&self) -> RegistryStatus {
        let registry = self.registry.lock().await;
        let params = registry.params();
        RegistryStatus {
            operational: registry.is_operational(),
            owner: registry.owner().clone(),
            founder: registry.founder().clone(),
            registered_count: registry.registered_count(),
            admission_mode: registry.admission_mode(),
            current_quorum: registry.current_quorum(),
            consensus_threshold: params.consensus_threshold,
            quorum_rule: params.quorum_rule,
            min_funding: params.min_funding,
            total_escrowed: registry.total_escrowed(),
            pending_proposals: registry.pending_proposals().len(),
        }
    }

    pub fn metrics_text(&self) -> Result<String, NodeError> {
        self.metrics.encode()
    }
}

async fn save_blocking(store: &Arc<SnapshotStore>, snapshot: RegistrySnapshot) -> Result<(), NodeError> {
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || store.save(&snapshot))
        .await
        .map_err(|e| NodeError::Other(format!("snapshot task failed: {e}")))?
}
