//! Prometheus metrics for the registry node.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`] that the RPC `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use surety_registry::{AirlineRegistry, RegistryEvent};

use crate::NodeError;

pub struct NodeMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Accepted `fund` calls.
    pub fundings: IntCounter,
    /// Airlines admitted, by admission mode.
    pub admissions: IntCounterVec,
    /// Votes recorded without reaching quorum.
    pub votes: IntCounter,
    /// Calls rejected by the registry, by error kind.
    pub rejected_calls: IntCounterVec,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub registered_airlines: IntGauge,
    pub pending_proposals: IntGauge,
    /// Escrowed value in whole units (truncated).
    pub escrowed_units: IntGauge,
    /// 1 when operational, 0 when paused.
    pub operational: IntGauge,
}

impl NodeMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let fundings = register_int_counter_with_registry!(
            Opts::new("surety_fundings_total", "Accepted funding contributions"),
            registry
        )
        .expect("failed to register fundings counter");

        let admissions = register_int_counter_vec_with_registry!(
            Opts::new("surety_admissions_total", "Airlines admitted to the registry"),
            &["mode"],
            registry
        )
        .expect("failed to register admissions counter");

        let votes = register_int_counter_with_registry!(
            Opts::new(
                "surety_votes_recorded_total",
                "Sponsor votes recorded short of quorum"
            ),
            registry
        )
        .expect("failed to register votes counter");

        let rejected_calls = register_int_counter_vec_with_registry!(
            Opts::new("surety_rejected_calls_total", "Registry calls rejected"),
            &["kind"],
            registry
        )
        .expect("failed to register rejected_calls counter");

        let registered_airlines = register_int_gauge_with_registry!(
            Opts::new("surety_registered_airlines", "Registered airlines"),
            registry
        )
        .expect("failed to register registered_airlines gauge");

        let pending_proposals = register_int_gauge_with_registry!(
            Opts::new("surety_pending_proposals", "Candidates awaiting quorum"),
            registry
        )
        .expect("failed to register pending_proposals gauge");

        let escrowed_units = register_int_gauge_with_registry!(
            Opts::new("surety_escrowed_units", "Escrowed value in whole units"),
            registry
        )
        .expect("failed to register escrowed_units gauge");

        let operational = register_int_gauge_with_registry!(
            Opts::new("surety_operational", "1 if the registry accepts mutations"),
            registry
        )
        .expect("failed to register operational gauge");

        Self {
            registry,
            fundings,
            admissions,
            votes,
            rejected_calls,
            registered_airlines,
            pending_proposals,
            escrowed_units,
            operational,
        }
    }

    pub fn observe_event(&self, event: &RegistryEvent) {
        match event {
            RegistryEvent::AirlineFunded { .. } => self.fundings.inc(),
            RegistryEvent::AirlineRegistered { mode, .. } => {
                self.admissions.with_label_values(&[mode.as_str()]).inc()
            }
            RegistryEvent::VoteRecorded { .. } => self.votes.inc(),
            RegistryEvent::OperatingStatusChanged { .. }
            | RegistryEvent::CallerAuthorized { .. }
            | RegistryEvent::CallerDeauthorized { .. } => {}
        }
    }

    pub fn observe_rejection(&self, kind: &str) {
        self.rejected_calls.with_label_values(&[kind]).inc();
    }

    /// Refresh gauges from the registry's committed state.
    pub fn sync_gauges(&self, registry: &AirlineRegistry) {
        self.registered_airlines
            .set(clamp_i64(registry.registered_count() as u128));
        self.pending_proposals
            .set(clamp_i64(registry.pending_proposals().len() as u128));
        self.escrowed_units
            .set(clamp_i64(registry.total_escrowed().whole_units()));
        self.operational.set(i64::from(registry.is_operational()));
    }

    /// Encode every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| NodeError::Other(e.to_string()))
    }
}

fn clamp_i64(v: u128) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}
