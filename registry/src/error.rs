use crate::participant::Role;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry is not operational")]
    SystemPaused,

    #[error("caller {caller} does not hold the {required} role")]
    Unauthorized { caller: String, required: Role },

    #[error("insufficient funding: needed {needed}, provided {provided}")]
    InsufficientAmount { needed: u128, provided: u128 },

    #[error("sponsor {sponsor} has already voted for {candidate}")]
    DuplicateVote { sponsor: String, candidate: String },

    #[error("airline {0} is already registered")]
    AlreadyRegistered(String),

    #[error("contribution overflow for {0}")]
    Overflow(String),

    #[error("inconsistent snapshot: {0}")]
    InconsistentSnapshot(String),
}

impl RegistryError {
    /// Stable machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SystemPaused => "system_paused",
            Self::Unauthorized { .. } => "unauthorized",
            Self::InsufficientAmount { .. } => "insufficient_amount",
            Self::DuplicateVote { .. } => "duplicate_vote",
            Self::AlreadyRegistered(_) => "already_registered",
            Self::Overflow(_) => "overflow",
            Self::InconsistentSnapshot(_) => "inconsistent_snapshot",
        }
    }
}
