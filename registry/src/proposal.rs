//! Registration proposals: sponsor votes collected for one candidate.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use surety_types::{AccountAddress, Timestamp};

/// Votes for admitting `candidate`, opened by the first sponsor to vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationProposal {
    pub candidate: AccountAddress,
    /// Distinct sponsors who voted. A set, so duplicates are detected exactly.
    pub sponsor_votes: BTreeSet<AccountAddress>,
    pub created_at: Timestamp,
    /// Registry-wide ordering marker; breaks ties between equal timestamps.
    pub sequence: u64,
}

impl RegistrationProposal {
    pub fn new(candidate: AccountAddress, created_at: Timestamp, sequence: u64) -> Self {
        Self {
            candidate,
            sponsor_votes: BTreeSet::new(),
            created_at,
            sequence,
        }
    }

    pub fn has_voted(&self, sponsor: &AccountAddress) -> bool {
        self.sponsor_votes.contains(sponsor)
    }

    pub fn vote_count(&self) -> u64 {
        self.sponsor_votes.len() as u64
    }

    /// Check that `sponsor` may still vote, without recording anything.
    pub fn check_vote(&self, sponsor: &AccountAddress) -> Result<(), RegistryError> {
        if self.has_voted(sponsor) {
            return Err(RegistryError::DuplicateVote {
                sponsor: sponsor.to_string(),
                candidate: self.candidate.to_string(),
            });
        }
        Ok(())
    }

    /// Record a vote. Returns the vote count afterwards.
    pub fn record_vote(&mut self, sponsor: AccountAddress) -> Result<u64, RegistryError> {
        self.check_vote(&sponsor)?;
        self.sponsor_votes.insert(sponsor);
        Ok(self.vote_count())
    }
}
