//! Events emitted by the registry for the node to process.

use crate::consensus::AdmissionMode;
use serde::{Deserialize, Serialize};
use surety_types::{AccountAddress, FundAmount};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// The operational flag changed value.
    OperatingStatusChanged { operational: bool },
    /// A front-end was added to the caller allowlist.
    CallerAuthorized { app: AccountAddress },
    /// A front-end was removed from the caller allowlist.
    CallerDeauthorized { app: AccountAddress },
    /// A contribution was accepted into escrow.
    AirlineFunded {
        airline: AccountAddress,
        amount: FundAmount,
        contributed: FundAmount,
        first_funding: bool,
    },
    /// A sponsor voted for a candidate that is still short of quorum.
    VoteRecorded {
        candidate: AccountAddress,
        sponsor: AccountAddress,
        votes: u64,
        quorum: u64,
    },
    /// A candidate joined the registry.
    AirlineRegistered {
        airline: AccountAddress,
        sponsor: AccountAddress,
        mode: AdmissionMode,
        votes: u64,
        registered_count: u64,
    },
}
