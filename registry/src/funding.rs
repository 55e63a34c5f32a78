//! Funding ledger: funded status, contributions, and escrow.

use crate::error::RegistryError;
use crate::participant::Participant;
use crate::state::RegistryState;
use serde::{Deserialize, Serialize};
use surety_types::{AccountAddress, FundAmount, Timestamp};

/// Result of an accepted contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingReceipt {
    pub amount: FundAmount,
    /// Cumulative contribution after this call.
    pub contributed: FundAmount,
    /// True when this call marked the airline funded.
    pub first_funding: bool,
}

/// Records contributions and the value held in escrow.
///
/// `total_escrowed` equals the sum of every participant's `contributed`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingLedger {
    min_funding: FundAmount,
    total_escrowed: FundAmount,
}

impl FundingLedger {
    pub fn new(min_funding: FundAmount) -> Self {
        Self {
            min_funding,
            total_escrowed: FundAmount::ZERO,
        }
    }

    pub fn min_funding(&self) -> FundAmount {
        self.min_funding
    }

    pub fn total_escrowed(&self) -> FundAmount {
        self.total_escrowed
    }

    /// Credit `amount` to `airline` and hold it in escrow.
    ///
    /// All checks run before the participant record is created or touched.
    pub fn credit(
        &mut self,
        state: &mut RegistryState,
        airline: &AccountAddress,
        amount: FundAmount,
        now: Timestamp,
    ) -> Result<FundingReceipt, RegistryError> {
        if amount < self.min_funding {
            return Err(RegistryError::InsufficientAmount {
                needed: self.min_funding.raw(),
                provided: amount.raw(),
            });
        }

        let current = state
            .participant(airline)
            .map(|p| p.contributed)
            .unwrap_or(FundAmount::ZERO);
        let contributed = current
            .checked_add(amount)
            .ok_or_else(|| RegistryError::Overflow(airline.to_string()))?;
        let escrowed = self
            .total_escrowed
            .checked_add(amount)
            .ok_or_else(|| RegistryError::Overflow(airline.to_string()))?;

        let participant = state
            .participants
            .entry(airline.clone())
            .or_insert_with(|| Participant::new(airline.clone()));
        let first_funding = !participant.funded;
        if first_funding {
            participant.funded = true;
            participant.funded_at = Some(now);
        }
        participant.contributed = contributed;
        self.total_escrowed = escrowed;

        Ok(FundingReceipt {
            amount,
            contributed,
            first_funding,
        })
    }

    /// Fail unless `total_escrowed` equals the sum of recorded contributions.
    pub fn check_consistency(&self, state: &RegistryState) -> Result<(), RegistryError> {
        let sum = state
            .participants()
            .try_fold(FundAmount::ZERO, |acc, p| acc.checked_add(p.contributed))
            .ok_or_else(|| {
                RegistryError::InconsistentSnapshot("contributions overflow".into())
            })?;
        if sum != self.total_escrowed {
            return Err(RegistryError::InconsistentSnapshot(format!(
                "total_escrowed is {} but contributions sum to {sum}",
                self.total_escrowed
            )));
        }
        Ok(())
    }

    pub fn contributed_balance(&self, state: &RegistryState, airline: &AccountAddress) -> FundAmount {
        state
            .participant(airline)
            .map(|p| p.contributed)
            .unwrap_or(FundAmount::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> AccountAddress {
        AccountAddress::new(s)
    }

    #[test]
    fn below_minimum_rejected_without_creating_record() {
        let mut ledger = FundingLedger::new(FundAmount::new(10));
        let mut state = RegistryState::new();
        let err = ledger
            .credit(&mut state, &addr("a1"), FundAmount::new(9), Timestamp::new(1))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::InsufficientAmount {
                needed: 10,
                provided: 9
            }
        );
        assert!(state.participant(&addr("a1")).is_none());
        assert_eq!(ledger.total_escrowed(), FundAmount::ZERO);
    }

    #[test]
    fn first_credit_marks_funded() {
        let mut ledger = FundingLedger::new(FundAmount::new(10));
        let mut state = RegistryState::new();
        let receipt = ledger
            .credit(&mut state, &addr("a1"), FundAmount::new(10), Timestamp::new(5))
            .unwrap();
        assert!(receipt.first_funding);
        assert_eq!(receipt.contributed, FundAmount::new(10));
        let p = state.participant(&addr("a1")).unwrap();
        assert!(p.funded);
        assert!(!p.registered);
        assert_eq!(p.funded_at, Some(Timestamp::new(5)));
    }

    #[test]
    fn repeated_credit_accumulates() {
        let mut ledger = FundingLedger::new(FundAmount::new(10));
        let mut state = RegistryState::new();
        ledger
            .credit(&mut state, &addr("a1"), FundAmount::new(10), Timestamp::new(1))
            .unwrap();
        let receipt = ledger
            .credit(&mut state, &addr("a1"), FundAmount::new(25), Timestamp::new(2))
            .unwrap();
        assert!(!receipt.first_funding);
        assert_eq!(ledger.contributed_balance(&state, &addr("a1")), FundAmount::new(35));
        assert_eq!(ledger.total_escrowed(), FundAmount::new(35));
        assert_eq!(
            state.participant(&addr("a1")).unwrap().funded_at,
            Some(Timestamp::new(1))
        );
    }

    #[test]
    fn overflow_rejected_before_mutation() {
        let mut ledger = FundingLedger::new(FundAmount::new(1));
        let mut state = RegistryState::new();
        ledger
            .credit(&mut state, &addr("a1"), FundAmount::new(u128::MAX), Timestamp::new(1))
            .unwrap();
        let err = ledger
            .credit(&mut state, &addr("a2"), FundAmount::new(1), Timestamp::new(2))
            .unwrap_err();
        assert_eq!(err, RegistryError::Overflow("a2".into()));
        assert!(state.participant(&addr("a2")).is_none());
        assert_eq!(ledger.total_escrowed(), FundAmount::new(u128::MAX));
    }
}
