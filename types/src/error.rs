//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account address {0:?}: {1}")]
    InvalidAddress(String, &'static str),

    #[error("invalid quorum rule: {0}")]
    InvalidQuorumRule(String),
}
