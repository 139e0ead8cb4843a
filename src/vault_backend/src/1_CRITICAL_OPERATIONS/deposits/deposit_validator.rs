//! Validation for deposit operations
//!
//! Estimate-based gate: runs before any asset moves, against the quoted
//! reference value. Real amounts are re-checked after the trade because
//! execution can legitimately diverge from the quote.

use candid::{Nat, Principal};

use crate::infrastructure::config::Config;
use crate::infrastructure::errors::{
    LedgerError, Result, ValidationError, VaultError,
};

/// Reject malformed deposit requests before quoting anything.
pub fn validate_deposit_request(caller: Principal, asset: Principal, amount: &Nat) -> Result<()> {
    if caller == Principal::anonymous() {
        return Err(VaultError::Validation(ValidationError::InvalidAccount {
            account: caller.to_text(),
        }));
    }

    if asset == Principal::anonymous() || asset == Principal::management_canister() {
        return Err(VaultError::Validation(ValidationError::InvalidAsset {
            asset: asset.to_text(),
            reason: "Placeholder identity supplied where a token ledger is required".to_string(),
        }));
    }

    if amount == &Nat::from(0u64) {
        return Err(VaultError::Validation(ValidationError::InvalidAmount {
            amount: "0".to_string(),
            reason: "Deposit amount cannot be zero".to_string(),
        }));
    }

    Ok(())
}

/// Check the quoted reference value against both caps.
///
/// Also applied to the **actual** executed amount after the trade; at
/// that point a bank-cap breach triggers the compensating refund in the
/// orchestrator.
pub fn validate_deposit_caps(value: &Nat, aggregate: &Nat, cfg: &Config) -> Result<()> {
    if value > &cfg.per_transaction_cap {
        return Err(VaultError::Validation(
            ValidationError::TransactionAmountExceeded {
                amount: value.to_string(),
                cap: cfg.per_transaction_cap.to_string(),
            },
        ));
    }

    if aggregate.clone() + value.clone() > cfg.bank_cap {
        return Err(VaultError::Ledger(LedgerError::DepositCapExceeded {
            attempted: value.to_string(),
            aggregate: aggregate.to_string(),
            cap: cfg.bank_cap.to_string(),
        }));
    }

    Ok(())
}
