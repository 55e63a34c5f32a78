//! Registry state: airlines, open proposals, and counters.

use crate::error::RegistryError;
use crate::participant::{Participant, Role};
use crate::proposal::RegistrationProposal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use surety_types::{AccountAddress, Timestamp};

/// The data the funding ledger and admission engine operate on.
///
/// `registered_count` always equals the number of participants with
/// `registered == true`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    pub(crate) participants: HashMap<AccountAddress, Participant>,
    pub(crate) proposals: HashMap<AccountAddress, RegistrationProposal>,
    pub(crate) registered_count: u64,
    /// Next ordering marker handed to a new proposal.
    pub(crate) next_sequence: u64,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participant(&self, address: &AccountAddress) -> Option<&Participant> {
        self.participants.get(address)
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn is_registered(&self, address: &AccountAddress) -> bool {
        self.participants.get(address).is_some_and(|p| p.registered)
    }

    pub fn is_funded(&self, address: &AccountAddress) -> bool {
        self.participants.get(address).is_some_and(|p| p.funded)
    }

    pub fn registered_count(&self) -> u64 {
        self.registered_count
    }

    pub fn proposal(&self, candidate: &AccountAddress) -> Option<&RegistrationProposal> {
        self.proposals.get(candidate)
    }

    /// Open proposals, oldest first.
    pub fn pending_proposals(&self) -> Vec<&RegistrationProposal> {
        let mut open: Vec<_> = self.proposals.values().collect();
        open.sort_by_key(|p| p.sequence);
        open
    }

    /// Fail unless `caller` is a funded, registered airline.
    ///
    /// Owner and allowlist roles belong to the access gate.
    pub fn require_sponsor(&self, caller: &AccountAddress) -> Result<(), RegistryError> {
        if self.participants.get(caller).is_some_and(Participant::is_sponsor) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                caller: caller.to_string(),
                required: Role::Sponsor,
            })
        }
    }

    /// Verify the counters and cross-references a restored state relies on.
    pub fn check_consistency(&self) -> Result<(), RegistryError> {
        let inconsistent = |msg: String| Err(RegistryError::InconsistentSnapshot(msg));

        for (key, participant) in &self.participants {
            if key != &participant.address {
                return inconsistent(format!(
                    "participant {} stored under {key}",
                    participant.address
                ));
            }
        }
        let registered = self.participants.values().filter(|p| p.registered).count() as u64;
        if registered != self.registered_count {
            return inconsistent(format!(
                "registered_count is {} but {registered} airlines are registered",
                self.registered_count
            ));
        }
        for (key, proposal) in &self.proposals {
            if key != &proposal.candidate {
                return inconsistent(format!(
                    "proposal for {} stored under {key}",
                    proposal.candidate
                ));
            }
            if self.is_registered(key) {
                return inconsistent(format!("open proposal for registered airline {key}"));
            }
            if proposal.sequence >= self.next_sequence {
                return inconsistent(format!(
                    "proposal for {key} has sequence {} at or past next_sequence {}",
                    proposal.sequence, self.next_sequence
                ));
            }
        }
        Ok(())
    }

    /// Admit an airline, creating its record if needed.
    ///
    /// Callers must have checked that it is not already registered.
    pub(crate) fn mark_registered(&mut self, address: &AccountAddress, now: Timestamp) {
        let entry = self
            .participants
            .entry(address.clone())
            .or_insert_with(|| Participant::new(address.clone()));
        debug_assert!(!entry.registered, "double registration of {address}");
        entry.registered = true;
        entry.registered_at = Some(now);
        self.registered_count += 1;
    }
}
