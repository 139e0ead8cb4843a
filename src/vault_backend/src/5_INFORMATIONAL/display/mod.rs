//! Estimates and vault status
//!
//! The estimates run the same path resolution as the real pipeline but
//! deduct no slippage and change no state. They still call out to the
//! venue for quotes, so they are exposed as update methods.

use candid::{Nat, Principal};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::infrastructure::constants::{self, REFERENCE_DECIMALS};
use crate::infrastructure::errors::{Result, ValidationError, VaultError};
use crate::infrastructure::{admin, config};
use crate::types::VaultStatus;
use crate::_2_CRITICAL_DATA::ledger;
use crate::_3_VENUE_ROUTING::routing;
use crate::_3_VENUE_ROUTING::venue::Venue;
use crate::_5_INFORMATIONAL::history;

/// Estimated reference-token credit for depositing `amount` of `asset`.
pub async fn estimate_deposit<V: Venue>(
    venue: &V,
    asset: Principal,
    amount: &Nat,
) -> Result<Nat> {
    require_nonzero(amount)?;
    routing::quote_to_reference(venue, asset, amount).await
}

/// Estimated native-token payout for withdrawing `amount` of reference.
pub async fn estimate_withdraw_native<V: Venue>(venue: &V, amount: &Nat) -> Result<Nat> {
    require_nonzero(amount)?;
    let reference = constants::reference_token()?;
    let native = constants::native_token()?;
    routing::quote_out(venue, amount, reference, native).await
}

/// Estimated payout in `asset` for withdrawing `amount` of reference.
pub async fn estimate_withdraw_asset<V: Venue>(
    venue: &V,
    amount: &Nat,
    asset: Principal,
) -> Result<Nat> {
    require_nonzero(amount)?;
    let reference = constants::reference_token()?;
    routing::quote_out(venue, amount, reference, asset).await
}

/// Local snapshot of the vault; no external calls.
pub fn get_vault_status() -> VaultStatus {
    let cfg = config::get();
    ledger::with_store(|store| VaultStatus {
        aggregate_balance: store.aggregate(),
        aggregate_display: format_reference_amount(&store.aggregate()),
        bank_cap: cfg.bank_cap.clone(),
        per_transaction_cap: cfg.per_transaction_cap.clone(),
        deposits_completed: store.deposits_completed(),
        withdrawals_completed: store.withdrawals_completed(),
        paused: admin::is_paused(),
        venue: config::venue_canister().ok(),
        conversion_records: history::record_count(),
    })
}

/// Render a base-unit reference amount as a decimal string, e.g.
/// 50_500 → "0.050500" at six decimals. Falls back to raw units when the
/// amount does not fit a Decimal.
pub fn format_reference_amount(amount: &Nat) -> String {
    amount
        .0
        .to_i128()
        .and_then(|units| Decimal::try_from_i128_with_scale(units, REFERENCE_DECIMALS).ok())
        .map(|decimal| decimal.to_string())
        .unwrap_or_else(|| amount.to_string())
}

fn require_nonzero(amount: &Nat) -> Result<()> {
    if amount == &Nat::from(0u64) {
        return Err(VaultError::Validation(ValidationError::InvalidAmount {
            amount: "0".to_string(),
            reason: "Amount must be greater than zero".to_string(),
        }));
    }
    Ok(())
}
