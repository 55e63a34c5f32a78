//! Airline records and caller roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use surety_types::{AccountAddress, FundAmount, Timestamp};

/// Capability a caller must hold for an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The single identity fixed at initialisation.
    Owner,
    /// A front-end on the caller allowlist.
    AuthorizedCaller,
    /// A funded, registered airline; may admit or vote for candidates.
    Sponsor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Owner => "owner",
            Self::AuthorizedCaller => "authorized-caller",
            Self::Sponsor => "sponsor",
        })
    }
}

/// An airline known to the registry.
///
/// Created on the first successful funding or on the first accepted vote or
/// admission naming it. Never removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub address: AccountAddress,
    /// Admitted to the active set; counts toward quorum.
    pub registered: bool,
    /// Has made at least one accepted contribution.
    pub funded: bool,
    /// Cumulative contributed value. Never decreases.
    pub contributed: FundAmount,
    pub registered_at: Option<Timestamp>,
    pub funded_at: Option<Timestamp>,
}

impl Participant {
    pub fn new(address: AccountAddress) -> Self {
        Self {
            address,
            registered: false,
            funded: false,
            contributed: FundAmount::ZERO,
            registered_at: None,
            funded_at: None,
        }
    }

    /// Funded and registered: eligible to admit or vote.
    pub fn is_sponsor(&self) -> bool {
        self.registered && self.funded
    }
}
