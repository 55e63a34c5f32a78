//! HTTP/JSON front-end for the surety registry node.
//!
//! Provides endpoints for:
//! - The operational switch and the caller allowlist (owner only)
//! - Funding contributions and the escrow total
//! - Candidate registration and sponsor votes
//! - Airline, registry and pending-proposal queries
//! - Prometheus metrics

pub mod error;
pub mod extract;
pub mod handlers;
pub mod pagination;
pub mod server;

pub use error::RpcError;
pub use server::{RpcServer, RpcState};
