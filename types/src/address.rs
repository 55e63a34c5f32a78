//! Account address type shared by owners, front-ends and airlines.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An account identity known to the registry.
///
/// The same type names the registry owner, airlines, and the front-end
/// applications on the caller allowlist. Addresses are opaque, case-sensitive
/// strings of ASCII alphanumerics, `_` and `-`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Longest accepted address, in bytes.
    pub const MAX_LEN: usize = 64;

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed address. Use [`AccountAddress::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(addr) => addr,
            Err(e) => panic!("{e}"),
        }
    }

    /// Parse and validate an address.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(TypesError::InvalidAddress(s, "address is empty"));
        }
        if s.len() > Self::MAX_LEN {
            return Err(TypesError::InvalidAddress(s, "address is too long"));
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(TypesError::InvalidAddress(
                s,
                "address contains characters outside [A-Za-z0-9_-]",
            ));
        }
        Ok(Self(s))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<AccountAddress> for String {
    fn from(addr: AccountAddress) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        let addr = AccountAddress::parse("airline_01-a").unwrap();
        assert_eq!(addr.as_str(), "airline_01-a");
        assert_eq!(addr.to_string(), "airline_01-a");
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(AccountAddress::parse("").is_err());
        assert!(AccountAddress::parse("a".repeat(AccountAddress::MAX_LEN + 1)).is_err());
        assert!(AccountAddress::parse("a".repeat(AccountAddress::MAX_LEN)).is_ok());
    }

    #[test]
    fn rejects_whitespace_and_punctuation() {
        assert!(AccountAddress::parse("air line").is_err());
        assert!("air/line".parse::<AccountAddress>().is_err());
    }

    #[test]
    #[should_panic]
    fn new_panics_on_invalid() {
        AccountAddress::new("bad address");
    }

    #[test]
    fn deserialization_validates() {
        let ok = bincode::serialize("owner").unwrap();
        assert!(bincode::deserialize::<AccountAddress>(&ok).is_ok());
        let bad = bincode::serialize("not valid!").unwrap();
        assert!(bincode::deserialize::<AccountAddress>(&bad).is_err());
    }
}
