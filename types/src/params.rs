//! Registry parameters: admission thresholds and the funding minimum.
//!
//! Fixed at initialisation. Loaded from the `[params]` table of the node
//! configuration; every field has a default.

use crate::amount::FundAmount;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many sponsor votes admit a candidate once the registry is in
/// consensus mode, as a function of the number of registered airlines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumRule {
    /// `ceil(n / 2)`: half of the registry, rounded up.
    #[default]
    AtLeastHalf,
    /// `floor(n / 2) + 1`: strictly more than half.
    StrictMajority,
}

impl QuorumRule {
    /// Votes required when `registered` airlines are in the registry.
    ///
    /// Never less than one, so an empty registry still needs a vote.
    pub fn quorum(&self, registered: u64) -> u64 {
        let q = match self {
            Self::AtLeastHalf => registered.div_ceil(2),
            Self::StrictMajority => registered / 2 + 1,
        };
        q.max(1)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtLeastHalf => "at_least_half",
            Self::StrictMajority => "strict_majority",
        }
    }
}

impl fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuorumRule {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "at_least_half" | "half" => Ok(Self::AtLeastHalf),
            "strict_majority" | "majority" => Ok(Self::StrictMajority),
            other => Err(TypesError::InvalidQuorumRule(other.to_string())),
        }
    }
}

/// Parameters governing admission and funding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryParams {
    /// Registered-airline count at which bootstrap admission ends and
    /// sponsor votes are required. Default: 4.
    pub consensus_threshold: u64,

    /// Minimum value a single `fund` call must carry. Default: 10 units.
    #[serde(with = "crate::amount::decimal")]
    pub min_funding: FundAmount,

    /// Vote threshold used in consensus mode.
    pub quorum_rule: QuorumRule,
}

impl RegistryParams {
    pub const DEFAULT_CONSENSUS_THRESHOLD: u64 = 4;
    pub const DEFAULT_MIN_FUNDING_UNITS: u64 = 10;
}

impl Default for RegistryParams {
    fn default() -> Self {
        Self {
            consensus_threshold: Self::DEFAULT_CONSENSUS_THRESHOLD,
            min_funding: FundAmount::units(Self::DEFAULT_MIN_FUNDING_UNITS),
            quorum_rule: QuorumRule::default(),
        }
    }
}
