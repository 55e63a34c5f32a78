//! Admission engine: bootstrap admission and sponsor-vote consensus.
//!
//! While fewer than `consensus_threshold` airlines are registered, any sponsor
//! admits a candidate on its own. From the threshold on, each sponsor call is a
//! vote and the candidate is admitted once the vote count reaches the quorum.
//! Mode and quorum are computed from the registered count at the moment each
//! call lands, never from a value remembered when the proposal opened.

use crate::error::RegistryError;
use crate::proposal::RegistrationProposal;
use crate::state::RegistryState;
use serde::{Deserialize, Serialize};
use surety_types::{AccountAddress, QuorumRule, RegistryParams, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionMode {
    /// Registry below the consensus threshold: no vote required.
    Bootstrap,
    /// Registry at or above the threshold: sponsor votes required.
    Consensus,
}

impl AdmissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Consensus => "consensus",
        }
    }
}

/// What an accepted `register_candidate` call did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdmissionOutcome {
    /// The candidate is now registered.
    Registered {
        candidate: AccountAddress,
        mode: AdmissionMode,
        /// Votes that carried the admission (zero in bootstrap mode).
        votes: u64,
    },
    /// The vote was recorded; the candidate is still waiting.
    VoteRecorded {
        candidate: AccountAddress,
        votes: u64,
        quorum: u64,
    },
}

impl AdmissionOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionEngine {
    consensus_threshold: u64,
    quorum_rule: QuorumRule,
}

impl AdmissionEngine {
    pub fn new(consensus_threshold: u64, quorum_rule: QuorumRule) -> Self {
        Self {
            consensus_threshold,
            quorum_rule,
        }
    }

    pub fn from_params(params: &RegistryParams) -> Self {
        Self::new(params.consensus_threshold, params.quorum_rule)
    }

    pub fn consensus_threshold(&self) -> u64 {
        self.consensus_threshold
    }

    pub fn quorum_rule(&self) -> QuorumRule {
        self.quorum_rule
    }

    pub fn mode(&self, registered_count: u64) -> AdmissionMode {
        if registered_count < self.consensus_threshold {
            AdmissionMode::Bootstrap
        } else {
            AdmissionMode::Consensus
        }
    }

    pub fn quorum(&self, registered_count: u64) -> u64 {
        self.quorum_rule.quorum(registered_count)
    }

    /// Process one sponsor's request to admit `candidate`.
    ///
    /// Check order: sponsor role, candidate not yet registered, then (in
    /// consensus mode) no earlier vote from this sponsor. Nothing is written
    /// until every check has passed.
    pub fn register(
        &self,
        state: &mut RegistryState,
        candidate: &AccountAddress,
        sponsor: &AccountAddress,
        now: Timestamp,
    ) -> Result<AdmissionOutcome, RegistryError> {
        state.require_sponsor(sponsor)?;
        if state.is_registered(candidate) {
            return Err(RegistryError::AlreadyRegistered(candidate.to_string()));
        }

        let registered = state.registered_count();
        match self.mode(registered) {
            AdmissionMode::Bootstrap => {
                state.mark_registered(candidate, now);
                Ok(AdmissionOutcome::Registered {
                    candidate: candidate.clone(),
                    mode: AdmissionMode::Bootstrap,
                    votes: 0,
                })
            }
            AdmissionMode::Consensus => {
                if let Some(open) = state.proposals.get(candidate) {
                    open.check_vote(sponsor)?;
                }

                let quorum = self.quorum(registered);
                let opened = !state.proposals.contains_key(candidate);
                let sequence = state.next_sequence;
                let votes = state
                    .proposals
                    .entry(candidate.clone())
                    .or_insert_with(|| RegistrationProposal::new(candidate.clone(), now, sequence))
                    .record_vote(sponsor.clone())?;
                if opened {
                    state.next_sequence += 1;
                }

                if votes >= quorum {
                    state.proposals.remove(candidate);
                    state.mark_registered(candidate, now);
                    Ok(AdmissionOutcome::Registered {
                        candidate: candidate.clone(),
                        mode: AdmissionMode::Consensus,
                        votes,
                    })
                } else {
                    Ok(AdmissionOutcome::VoteRecorded {
                        candidate: candidate.clone(),
                        votes,
                        quorum,
                    })
                }
            }
        }
    }
}

impl Default for AdmissionEngine {
    fn default() -> Self {
        Self::from_params(&RegistryParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funding::FundingLedger;
    use surety_types::FundAmount;

    fn addr(s: &str) -> AccountAddress {
        AccountAddress::new(s)
    }

    /// State with `n` funded, registered sponsors named `s0..s{n-1}`.
    fn state_with_sponsors(n: usize) -> RegistryState {
        let mut state = RegistryState::new();
        let mut ledger = FundingLedger::new(FundAmount::new(1));
        for i in 0..n {
            let a = addr(&format!("s{i}"));
            ledger
                .credit(&mut state, &a, FundAmount::new(1), Timestamp::new(0))
                .unwrap();
            state.mark_registered(&a, Timestamp::new(0));
        }
        state
    }

    #[test]
    fn mode_boundary() {
        let engine = AdmissionEngine::default();
        assert_eq!(engine.mode(0), AdmissionMode::Bootstrap);
        assert_eq!(engine.mode(3), AdmissionMode::Bootstrap);
        assert_eq!(engine.mode(4), AdmissionMode::Consensus);
        assert_eq!(engine.mode(100), AdmissionMode::Consensus);
    }

    #[test]
    fn bootstrap_admits_immediately() {
        let engine = AdmissionEngine::default();
        let mut state = state_with_sponsors(1);
        let outcome = engine
            .register(&mut state, &addr("c1"), &addr("s0"), Timestamp::new(9))
            .unwrap();
        assert_eq!(
            outcome,
            AdmissionOutcome::Registered {
                candidate: addr("c1"),
                mode: AdmissionMode::Bootstrap,
                votes: 0
            }
        );
        assert!(state.is_registered(&addr("c1")));
        assert_eq!(state.registered_count(), 2);
        assert_eq!(
            state.participant(&addr("c1")).unwrap().registered_at,
            Some(Timestamp::new(9))
        );
    }

    #[test]
    fn unfunded_sponsor_rejected_without_side_effects() {
        let engine = AdmissionEngine::default();
        let mut state = RegistryState::new();
        state.mark_registered(&addr("founder"), Timestamp::new(0));
        let before = state.clone();

        let err = engine
            .register(&mut state, &addr("c1"), &addr("founder"), Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn funded_but_unregistered_caller_is_not_a_sponsor() {
        let engine = AdmissionEngine::default();
        let mut state = state_with_sponsors(1);
        let mut ledger = FundingLedger::new(FundAmount::new(1));
        ledger
            .credit(&mut state, &addr("outsider"), FundAmount::new(1), Timestamp::new(0))
            .unwrap();
        let err = engine
            .register(&mut state, &addr("c1"), &addr("outsider"), Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized { .. }));
    }

    #[test]
    fn consensus_needs_quorum() {
        let engine = AdmissionEngine::default();
        let mut state = state_with_sponsors(4);

        let first = engine
            .register(&mut state, &addr("c1"), &addr("s0"), Timestamp::new(1))
            .unwrap();
        assert_eq!(
            first,
            AdmissionOutcome::VoteRecorded {
                candidate: addr("c1"),
                votes: 1,
                quorum: 2
            }
        );
        assert!(!state.is_registered(&addr("c1")));
        assert_eq!(state.proposal(&addr("c1")).unwrap().vote_count(), 1);

        let second = engine
            .register(&mut state, &addr("c1"), &addr("s1"), Timestamp::new(2))
            .unwrap();
        assert!(second.is_registered());
        assert!(state.is_registered(&addr("c1")));
        assert_eq!(state.registered_count(), 5);
        assert!(state.proposal(&addr("c1")).is_none());
    }

    #[test]
    fn duplicate_vote_leaves_count_unchanged() {
        let engine = AdmissionEngine::default();
        let mut state = state_with_sponsors(6);
        engine
            .register(&mut state, &addr("c1"), &addr("s0"), Timestamp::new(1))
            .unwrap();
        let err = engine
            .register(&mut state, &addr("c1"), &addr("s0"), Timestamp::new(2))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateVote { .. }));
        assert_eq!(state.proposal(&addr("c1")).unwrap().vote_count(), 1);
    }

    #[test]
    fn registered_candidate_rejects_further_votes() {
        let engine = AdmissionEngine::default();
        let mut state = state_with_sponsors(4);
        engine
            .register(&mut state, &addr("c1"), &addr("s0"), Timestamp::new(1))
            .unwrap();
        engine
            .register(&mut state, &addr("c1"), &addr("s1"), Timestamp::new(1))
            .unwrap();

        let err = engine
            .register(&mut state, &addr("c1"), &addr("s2"), Timestamp::new(2))
            .unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("c1".into()));
        let err = engine
            .register(&mut state, &addr("c1"), &addr("s0"), Timestamp::new(2))
            .unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("c1".into()));
        assert_eq!(state.registered_count(), 5);
    }

    #[test]
    fn strict_majority_of_four_needs_three() {
        let engine = AdmissionEngine::new(4, QuorumRule::StrictMajority);
        let mut state = state_with_sponsors(4);
        for (i, expected) in [(0, false), (1, false), (2, true)] {
            let outcome = engine
                .register(&mut state, &addr("c1"), &addr(&format!("s{i}")), Timestamp::new(1))
                .unwrap();
            assert_eq!(outcome.is_registered(), expected);
        }
    }

    #[test]
    fn quorum_tracks_current_registry_size() {
        let engine = AdmissionEngine::default();
        let mut state = state_with_sponsors(6);
        // quorum(6) = 3
        engine
            .register(&mut state, &addr("slow"), &addr("s0"), Timestamp::new(1))
            .unwrap();
        engine
            .register(&mut state, &addr("slow"), &addr("s1"), Timestamp::new(1))
            .unwrap();
        assert!(!state.is_registered(&addr("slow")));

        // Two more admissions raise the registry to 8; quorum(8) = 4.
        for c in ["fast1", "fast2"] {
            for s in ["s2", "s3", "s4", "s5"] {
                let _ = engine.register(&mut state, &addr(c), &addr(s), Timestamp::new(2));
            }
        }
        assert_eq!(state.registered_count(), 8);

        let outcome = engine
            .register(&mut state, &addr("slow"), &addr("s2"), Timestamp::new(3))
            .unwrap();
        assert_eq!(
            outcome,
            AdmissionOutcome::VoteRecorded {
                candidate: addr("slow"),
                votes: 3,
                quorum: 4
            }
        );
    }

    #[test]
    fn proposals_are_ordered_by_creation() {
        let engine = AdmissionEngine::default();
        let mut state = state_with_sponsors(6);
        for c in ["c_b", "c_a", "c_c"] {
            engine
                .register(&mut state, &addr(c), &addr("s0"), Timestamp::new(1))
                .unwrap();
        }
        let order: Vec<_> = state
            .pending_proposals()
            .iter()
            .map(|p| p.candidate.as_str().to_string())
            .collect();
        assert_eq!(order, vec!["c_b", "c_a", "c_c"]);
    }
}
