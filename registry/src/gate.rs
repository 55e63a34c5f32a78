//! Access gate: the operational switch and the caller allowlist.
//!
//! Every mutating registry operation calls [`AccessGate::require_operational`]
//! before anything else. Only the owner may flip the switch or edit the
//! allowlist; those owner operations stay available while paused so a paused
//! registry can be resumed.

use crate::error::RegistryError;
use crate::participant::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use surety_types::AccountAddress;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGate {
    owner: AccountAddress,
    operational: bool,
    authorized_callers: BTreeSet<AccountAddress>,
}

impl AccessGate {
    /// A new gate is open and has an empty allowlist.
    pub fn new(owner: AccountAddress) -> Self {
        Self {
            owner,
            operational: true,
            authorized_callers: BTreeSet::new(),
        }
    }

    pub fn owner(&self) -> &AccountAddress {
        &self.owner
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    pub fn require_operational(&self) -> Result<(), RegistryError> {
        if self.operational {
            Ok(())
        } else {
            Err(RegistryError::SystemPaused)
        }
    }

    pub fn require_owner(&self, caller: &AccountAddress) -> Result<(), RegistryError> {
        if caller == &self.owner {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                caller: caller.to_string(),
                required: Role::Owner,
            })
        }
    }

    /// Set the operational flag. Returns whether the value changed.
    pub fn set_operating_status(
        &mut self,
        operational: bool,
        caller: &AccountAddress,
    ) -> Result<bool, RegistryError> {
        self.require_owner(caller)?;
        let changed = self.operational != operational;
        self.operational = operational;
        Ok(changed)
    }

    /// Add a front-end to the allowlist. Returns whether it was newly added.
    pub fn authorize_caller(
        &mut self,
        app: AccountAddress,
        caller: &AccountAddress,
    ) -> Result<bool, RegistryError> {
        self.require_owner(caller)?;
        Ok(self.authorized_callers.insert(app))
    }

    /// Remove a front-end from the allowlist. Returns whether it was present.
    pub fn deauthorize_caller(
        &mut self,
        app: &AccountAddress,
        caller: &AccountAddress,
    ) -> Result<bool, RegistryError> {
        self.require_owner(caller)?;
        Ok(self.authorized_callers.remove(app))
    }

    pub fn is_caller_authorized(&self, app: &AccountAddress) -> bool {
        self.authorized_callers.contains(app)
    }

    pub fn require_authorized_caller(&self, app: &AccountAddress) -> Result<(), RegistryError> {
        if self.is_caller_authorized(app) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                caller: app.to_string(),
                required: Role::AuthorizedCaller,
            })
        }
    }

    pub fn authorized_callers(&self) -> impl Iterator<Item = &AccountAddress> {
        self.authorized_callers.iter()
    }
}
