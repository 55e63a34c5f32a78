//! Funding amount type.
//!
//! Amounts are fixed-point integers (u128) in raw units to avoid floating-point
//! errors. One whole unit is [`FUND_UNIT`] raw.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Raw units per whole funding unit.
pub const FUND_UNIT: u128 = 1_000_000_000_000_000_000;

/// Value contributed to (and escrowed by) the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FundAmount(u128);

impl FundAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole units, e.g. `FundAmount::units(10)` is ten units.
    pub fn units(whole: u64) -> Self {
        Self(whole as u128 * FUND_UNIT)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Whole units, truncating any fractional remainder.
    pub fn whole_units(&self) -> u128 {
        self.0 / FUND_UNIT
    }
}

/// Saturates at `u128::MAX`; ledger paths use [`FundAmount::checked_add`].
impl Add for FundAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sum for FundAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for FundAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} raw", self.0)
    }
}

/// Serde adapter writing an amount as a decimal string of raw units.
///
/// TOML integers are 64-bit, which cannot hold typical raw amounts, so
/// configuration files carry amounts as strings: `min_funding = "10000000000000000000"`.
pub mod decimal {
    use super::FundAmount;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &FundAmount, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&amount.raw().to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<FundAmount, D::Error> {
        let raw = String::deserialize(d)?;
        raw.trim()
            .parse::<u128>()
            .map(FundAmount::new)
            .map_err(|e| de::Error::custom(format!("invalid amount {raw:?}: {e}")))
    }
}
