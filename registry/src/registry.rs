//! The registry aggregate: gate, ledger, admission engine and state behind
//! one owner.
//!
//! Every mutating method runs the same prologue: operational check, then the
//! caller's role, then operation-specific checks, and only then writes. A
//! failed call leaves the registry exactly as it was.

use crate::consensus::{AdmissionEngine, AdmissionMode, AdmissionOutcome};
use crate::error::RegistryError;
use crate::events::RegistryEvent;
use crate::funding::{FundingLedger, FundingReceipt};
use crate::gate::AccessGate;
use crate::participant::Participant;
use crate::proposal::RegistrationProposal;
use crate::state::RegistryState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use surety_types::{AccountAddress, Clock, FundAmount, RegistryParams, SystemClock};
use tracing::{debug, info};

pub struct AirlineRegistry {
    gate: AccessGate,
    ledger: FundingLedger,
    admission: AdmissionEngine,
    state: RegistryState,
    params: RegistryParams,
    founder: AccountAddress,
    clock: Arc<dyn Clock>,
    /// Pending events for the node to process.
    pending_events: Vec<RegistryEvent>,
}

impl AirlineRegistry {
    /// Create a registry owned by `owner` with `founder` pre-registered.
    ///
    /// The founder is registered but unfunded: it must fund before it can
    /// admit anyone.
    pub fn new(owner: AccountAddress, founder: AccountAddress, params: RegistryParams) -> Self {
        Self::with_clock(owner, founder, params, Arc::new(SystemClock))
    }

    pub fn with_clock(
        owner: AccountAddress,
        founder: AccountAddress,
        params: RegistryParams,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut state = RegistryState::new();
        state.mark_registered(&founder, clock.now());
        info!(%owner, %founder, "airline registry initialised");
        Self {
            gate: AccessGate::new(owner),
            ledger: FundingLedger::new(params.min_funding),
            admission: AdmissionEngine::from_params(&params),
            state,
            params,
            founder,
            clock,
            pending_events: Vec::new(),
        }
    }

    // ── Access gate ────────────────────────────────────────────────────

    pub fn is_operational(&self) -> bool {
        self.gate.is_operational()
    }

    /// Owner-only. Allowed while paused so the registry can be resumed.
    pub fn set_operating_status(
        &mut self,
        operational: bool,
        caller: &AccountAddress,
    ) -> Result<(), RegistryError> {
        if self.gate.set_operating_status(operational, caller)? {
            info!(operational, "operating status changed");
            self.pending_events
                .push(RegistryEvent::OperatingStatusChanged { operational });
        }
        Ok(())
    }

    pub fn authorize_caller(
        &mut self,
        app: &AccountAddress,
        caller: &AccountAddress,
    ) -> Result<(), RegistryError> {
        if self.gate.authorize_caller(app.clone(), caller)? {
            info!(%app, "caller authorized");
            self.pending_events
                .push(RegistryEvent::CallerAuthorized { app: app.clone() });
        }
        Ok(())
    }

    pub fn deauthorize_caller(
        &mut self,
        app: &AccountAddress,
        caller: &AccountAddress,
    ) -> Result<(), RegistryError> {
        if self.gate.deauthorize_caller(app, caller)? {
            info!(%app, "caller deauthorized");
            self.pending_events
                .push(RegistryEvent::CallerDeauthorized { app: app.clone() });
        }
        Ok(())
    }

    pub fn is_caller_authorized(&self, app: &AccountAddress) -> bool {
        self.gate.is_caller_authorized(app)
    }

    pub fn require_authorized_caller(&self, app: &AccountAddress) -> Result<(), RegistryError> {
        self.gate.require_authorized_caller(app)
    }

    pub fn owner(&self) -> &AccountAddress {
        self.gate.owner()
    }

    // ── Funding ledger ─────────────────────────────────────────────────

    /// Contribute `amount` on behalf of `airline` (the caller).
    pub fn fund(
        &mut self,
        airline: &AccountAddress,
        amount: FundAmount,
    ) -> Result<FundingReceipt, RegistryError> {
        self.gate.require_operational()?;
        let now = self.clock.now();
        let receipt = self.ledger.credit(&mut self.state, airline, amount, now)?;

        info!(
            %airline,
            amount = %receipt.amount,
            contributed = %receipt.contributed,
            first = receipt.first_funding,
            "airline funded"
        );
        self.pending_events.push(RegistryEvent::AirlineFunded {
            airline: airline.clone(),
            amount: receipt.amount,
            contributed: receipt.contributed,
            first_funding: receipt.first_funding,
        });
        Ok(receipt)
    }

    pub fn is_funded(&self, airline: &AccountAddress) -> bool {
        self.state.is_funded(airline)
    }

    pub fn contributed_balance(&self, airline: &AccountAddress) -> FundAmount {
        self.ledger.contributed_balance(&self.state, airline)
    }

    /// Total value held by the registry across all contributions.
    pub fn total_escrowed(&self) -> FundAmount {
        self.ledger.total_escrowed()
    }

    // ── Admission ──────────────────────────────────────────────────────

    /// `sponsor` asks for `candidate` to be admitted (or votes for it).
    pub fn register_candidate(
        &mut self,
        candidate: &AccountAddress,
        sponsor: &AccountAddress,
    ) -> Result<AdmissionOutcome, RegistryError> {
        self.gate.require_operational()?;
        let now = self.clock.now();
        let outcome = self
            .admission
            .register(&mut self.state, candidate, sponsor, now)?;

        match &outcome {
            AdmissionOutcome::Registered { mode, votes, .. } => {
                let registered_count = self.state.registered_count();
                info!(
                    airline = %candidate,
                    %sponsor,
                    mode = mode.as_str(),
                    votes,
                    registered_count,
                    "airline registered"
                );
                self.pending_events.push(RegistryEvent::AirlineRegistered {
                    airline: candidate.clone(),
                    sponsor: sponsor.clone(),
                    mode: *mode,
                    votes: *votes,
                    registered_count,
                });
            }
            AdmissionOutcome::VoteRecorded { votes, quorum, .. } => {
                debug!(%candidate, %sponsor, votes, quorum, "registration vote recorded");
                self.pending_events.push(RegistryEvent::VoteRecorded {
                    candidate: candidate.clone(),
                    sponsor: sponsor.clone(),
                    votes: *votes,
                    quorum: *quorum,
                });
            }
        }
        Ok(outcome)
    }

    pub fn is_registered(&self, airline: &AccountAddress) -> bool {
        self.state.is_registered(airline)
    }

    pub fn registered_count(&self) -> u64 {
        self.state.registered_count()
    }

    /// Mode the next `register_candidate` call would run under.
    pub fn admission_mode(&self) -> AdmissionMode {
        self.admission.mode(self.state.registered_count())
    }

    /// Votes a candidate would currently need in consensus mode.
    pub fn current_quorum(&self) -> u64 {
        self.admission.quorum(self.state.registered_count())
    }

    pub fn proposal(&self, candidate: &AccountAddress) -> Option<&RegistrationProposal> {
        self.state.proposal(candidate)
    }

    pub fn vote_count(&self, candidate: &AccountAddress) -> u64 {
        self.state
            .proposal(candidate)
            .map(RegistrationProposal::vote_count)
            .unwrap_or(0)
    }

    /// Open proposals, oldest first.
    pub fn pending_proposals(&self) -> Vec<&RegistrationProposal> {
        self.state.pending_proposals()
    }

    pub fn participant(&self, airline: &AccountAddress) -> Option<&Participant> {
        self.state.participant(airline)
    }

    pub fn founder(&self) -> &AccountAddress {
        &self.founder
    }

    pub fn params(&self) -> &RegistryParams {
        &self.params
    }

    // ── Events & persistence ───────────────────────────────────────────

    /// Drain pending events for the node to process.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Capture the full registry state for persistence.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            gate: self.gate.clone(),
            ledger: self.ledger.clone(),
            state: self.state.clone(),
            params: self.params.clone(),
            founder: self.founder.clone(),
        }
    }

    /// Rebuild a registry from a snapshot, reading time from `clock`.
    ///
    /// Rejects a snapshot whose counters disagree with its records.
    pub fn restore(
        snapshot: RegistrySnapshot,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RegistryError> {
        snapshot.state.check_consistency()?;
        snapshot.ledger.check_consistency(&snapshot.state)?;
        if !snapshot.state.is_registered(&snapshot.founder) {
            return Err(RegistryError::InconsistentSnapshot(format!(
                "founder {} is not registered",
                snapshot.founder
            )));
        }
        Ok(Self {
            gate: snapshot.gate,
            ledger: snapshot.ledger,
            admission: AdmissionEngine::from_params(&snapshot.params),
            state: snapshot.state,
            params: snapshot.params,
            founder: snapshot.founder,
            clock,
            pending_events: Vec::new(),
        })
    }
}

/// Serializable registry state for persistence across restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub gate: AccessGate,
    pub ledger: FundingLedger,
    pub state: RegistryState,
    pub params: RegistryParams,
    pub founder: AccountAddress,
}

impl RegistrySnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}
