//! Airline admission registry.
//!
//! Three components composed behind one owned aggregate:
//! 1. **Access gate**: the owner-controlled operational switch and the
//!    allowlist of front-ends permitted to drive the registry.
//! 2. **Funding ledger**: per-airline funded status and contributions, plus
//!    the total value held in escrow.
//! 3. **Admission engine**: bootstrap admission while the registry is small,
//!    sponsor votes with a quorum once it reaches the consensus threshold.
//!
//! All mutation goes through [`AirlineRegistry`], whose methods check every
//! precondition before touching state.

pub mod consensus;
pub mod error;
pub mod events;
pub mod funding;
pub mod gate;
pub mod participant;
pub mod proposal;
pub mod registry;
pub mod state;

pub use consensus::{AdmissionEngine, AdmissionMode, AdmissionOutcome};
pub use error::RegistryError;
pub use events::RegistryEvent;
pub use funding::{FundingLedger, FundingReceipt};
pub use gate::AccessGate;
pub use participant::{Participant, Role};
pub use proposal::RegistrationProposal;
pub use registry::{AirlineRegistry, RegistrySnapshot};
pub use state::RegistryState;
