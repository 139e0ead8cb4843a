//! Install-time configuration
//!
//! Caps and the admin identity are fixed in `init` and never change
//! afterwards. The swap venue reference is the one rotatable piece of
//! state, admin-gated at the endpoint layer.

use std::cell::RefCell;

use candid::{CandidType, Deserialize, Nat, Principal};

use crate::infrastructure::constants::{
    DEFAULT_BANK_CAP, DEFAULT_PER_TRANSACTION_CAP, SWAP_VENUE_ID,
};
use crate::infrastructure::errors::{Result, ValidationError, VaultError};
use crate::types::InitArgs;

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct Config {
    pub per_transaction_cap: Nat,
    pub bank_cap: Nat,
    pub admin: Principal,
}

impl Config {
    pub fn from_init(args: &InitArgs) -> Self {
        Self {
            per_transaction_cap: args
                .per_transaction_cap
                .clone()
                .unwrap_or_else(|| Nat::from(DEFAULT_PER_TRANSACTION_CAP)),
            bank_cap: args
                .bank_cap
                .clone()
                .unwrap_or_else(|| Nat::from(DEFAULT_BANK_CAP)),
            admin: args.admin,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            per_transaction_cap: Nat::from(DEFAULT_PER_TRANSACTION_CAP),
            bank_cap: Nat::from(DEFAULT_BANK_CAP),
            admin: Principal::anonymous(),
        }
    }
}

thread_local! {
    static CONFIG: RefCell<Option<Config>> = RefCell::new(None);
    static VENUE: RefCell<Option<Principal>> = RefCell::new(None);
}

pub fn install(config: Config) {
    CONFIG.with(|c| *c.borrow_mut() = Some(config));
}

/// Current configuration; compiled defaults before `init` has run.
pub fn get() -> Config {
    CONFIG.with(|c| c.borrow().clone().unwrap_or_default())
}

/// The venue canister the trade executor talks to.
pub fn venue_canister() -> Result<Principal> {
    if let Some(venue) = VENUE.with(|v| *v.borrow()) {
        return Ok(venue);
    }
    Principal::from_text(SWAP_VENUE_ID)
        .map_err(|e| VaultError::Other(format!("Invalid venue principal: {}", e)))
}

/// Rotate the venue reference. Caps stay immutable; this is the only
/// post-install mutation the configuration allows.
pub fn set_venue_canister(venue: Principal) -> Result<()> {
    if venue == Principal::anonymous() || venue == Principal::management_canister() {
        return Err(VaultError::Validation(ValidationError::InvalidAccount {
            account: venue.to_text(),
        }));
    }
    VENUE.with(|v| *v.borrow_mut() = Some(venue));
    Ok(())
}

pub fn venue_override() -> Option<Principal> {
    VENUE.with(|v| *v.borrow())
}

pub fn restore_venue(venue: Option<Principal>) {
    VENUE.with(|v| *v.borrow_mut() = venue);
}
