//! Fundamental types for the surety airline registry.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, funding amounts, timestamps and clocks, registry parameters,
//! and the address parsing error.

pub mod address;
pub mod amount;
pub mod error;
pub mod params;
pub mod time;

pub use address::AccountAddress;
pub use amount::{FundAmount, FUND_UNIT};
pub use error::TypesError;
pub use params::{QuorumRule, RegistryParams};
pub use time::{Clock, SystemClock, Timestamp};
