//! Validation for withdrawal operations
//!
//! The debit is deterministic - only the output side of a converted
//! withdrawal is estimated - so all checks run against the nominal
//! reference amount requested. No post-trade re-check is needed; the
//! aggregate only shrinks.

use candid::{Nat, Principal};

use crate::infrastructure::config::Config;
use crate::infrastructure::errors::{
    LedgerError, Result, ValidationError, VaultError,
};

pub fn validate_withdrawal_request(
    caller: Principal,
    amount: &Nat,
    available: &Nat,
    cfg: &Config,
) -> Result<()> {
    if caller == Principal::anonymous() {
        return Err(VaultError::Validation(ValidationError::InvalidAccount {
            account: caller.to_text(),
        }));
    }

    if amount == &Nat::from(0u64) {
        return Err(VaultError::Validation(ValidationError::InvalidAmount {
            amount: "0".to_string(),
            reason: "Withdrawal amount cannot be zero".to_string(),
        }));
    }

    if amount > available {
        return Err(VaultError::Ledger(LedgerError::InsufficientBalance {
            requested: amount.to_string(),
            available: available.to_string(),
        }));
    }

    if amount > &cfg.per_transaction_cap {
        return Err(VaultError::Validation(
            ValidationError::TransactionAmountExceeded {
                amount: amount.to_string(),
                cap: cfg.per_transaction_cap.to_string(),
            },
        ));
    }

    Ok(())
}
