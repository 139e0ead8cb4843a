//! System-wide constants
//!
//! Token and venue canister ids are fixed at build time; caps come from
//! install arguments with the defaults below.

use candid::Principal;
use crate::infrastructure::{Result, VaultError};

/// ckUSDT ledger - the reference token all custody is denominated in
pub const REFERENCE_TOKEN_ID: &str = "cngnf-vqaaa-aaaar-qag4q-cai";

/// ICP ledger - the native token, also the bridging hop for two-leg paths
pub const NATIVE_TOKEN_ID: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";

/// Default swap venue backend
pub const SWAP_VENUE_ID: &str = "2ipq2-uqaaa-aaaar-qailq-cai";

/// Default per-operation cap, reference-token base units
pub const DEFAULT_PER_TRANSACTION_CAP: u64 = 100_000;

/// Default aggregate custody cap, reference-token base units
pub const DEFAULT_BANK_CAP: u64 = 1_000_000;

/// Accepted fraction of a quoted output: 98/100 = at most 2% negative slippage
pub const SLIPPAGE_NUMERATOR: u64 = 98;
pub const SLIPPAGE_DENOMINATOR: u64 = 100;

/// Advisory deadline window handed to the venue (5 minutes)
pub const SWAP_DEADLINE_NANOS: u64 = 300_000_000_000;

/// Reference token decimals, for display formatting only
pub const REFERENCE_DECIMALS: u32 = 6;

/// Bounded audit log sizes
pub const MAX_CONVERSION_HISTORY: usize = 1000;
pub const MAX_ADMIN_LOG_ENTRIES: usize = 1000;

pub fn reference_token() -> Result<Principal> {
    Principal::from_text(REFERENCE_TOKEN_ID)
        .map_err(|e| VaultError::Other(format!("Invalid reference token principal: {}", e)))
}

pub fn native_token() -> Result<Principal> {
    Principal::from_text(NATIVE_TOKEN_ID)
        .map_err(|e| VaultError::Other(format!("Invalid native token principal: {}", e)))
}

/// The bridging token for two-hop paths is the native token.
pub fn bridge_token() -> Result<Principal> {
    native_token()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_principals_valid() {
        assert!(reference_token().is_ok());
        assert!(native_token().is_ok());
        assert!(Principal::from_text(SWAP_VENUE_ID).is_ok());
    }

    #[test]
    fn test_slippage_ratio_sane() {
        assert!(SLIPPAGE_NUMERATOR < SLIPPAGE_DENOMINATOR);
        assert!(SLIPPAGE_DENOMINATOR > 0);
    }
}
