//! Deposit pipeline
//!
//! Converts an incoming asset into the reference token and credits the
//! depositor with what the trade actually returned, never the estimate.
//!
//! FLOW:
//! 1. Acquire the entry guard (reentrancy) and run the estimate-based gate
//! 2. Pull the asset into custody via ICRC-2 transfer_from
//! 3. Swap it to the reference token, slippage-bounded
//! 4. Re-check the bank cap against the ACTUAL amount received
//! 5. Credit the ledger, bump counters, record the conversion
//!
//! A swap failure after the pull refunds the input asset; a bank-cap
//! breach after the swap refunds the reference-token proceeds. Either
//! way no balance mutation is observable for a failed request.

pub mod deposit_validator;

#[cfg(test)]
mod tests;

use candid::{Nat, Principal};

use crate::infrastructure::errors::{
    LedgerError, Result, ValidationError, VaultError,
};
use crate::infrastructure::{admin, config, constants, EntryGuard};
use crate::types::{ConversionDirection, ConversionRecord, OpContext};
use crate::_2_CRITICAL_DATA::ledger;
use crate::_3_VENUE_ROUTING::routing;
use crate::_3_VENUE_ROUTING::venue::Venue;
use crate::_4_TRADING_EXECUTION::swaps;
use crate::_4_TRADING_EXECUTION::transfers::Transfers;

/// Deposit `amount` of the native token. Credits the caller with the
/// reference-token amount the conversion actually produced.
pub async fn deposit_native<V: Venue, T: Transfers>(
    ctx: &OpContext,
    amount: Nat,
    venue: &V,
    tokens: &T,
) -> Result<Nat> {
    let native = constants::native_token()?;
    deposit_asset(ctx, native, amount, venue, tokens).await
}

/// Deposit `amount` of an arbitrary ICRC token.
pub async fn deposit_asset<V: Venue, T: Transfers>(
    ctx: &OpContext,
    asset: Principal,
    amount: Nat,
    venue: &V,
    tokens: &T,
) -> Result<Nat> {
    admin::check_not_paused()?;
    let _guard = EntryGuard::acquire("deposit")?;

    deposit_validator::validate_deposit_request(ctx.caller, asset, &amount)?;

    // Estimate-based gate before any asset moves
    let cfg = config::get();
    let estimate = routing::quote_to_reference(venue, asset, &amount).await?;
    let aggregate = ledger::with_store(|store| store.aggregate());
    deposit_validator::validate_deposit_caps(&estimate, &aggregate, &cfg)?;

    ic_cdk::println!(
        "💰 Deposit: {} of {} from {} (estimated {} reference)",
        amount,
        asset.to_text(),
        ctx.caller.to_text(),
        estimate
    );

    // Pull into custody. From here on, failures must compensate.
    tokens
        .transfer_from(asset, ctx.caller, ctx.self_id, amount.clone())
        .await?;

    settle_deposit(ctx, asset, amount, venue, tokens, Some(ctx.caller)).await
}

/// Convert any native-token balance the canister holds outside custody
/// into a deposit credited to the caller.
///
/// Tokens transferred straight to the canister bypass `transfer_from`,
/// and the ledger does not expose who sent them; whoever claims first is
/// credited. Custody is all-reference between requests, so the entire
/// native balance is by definition unsolicited.
pub async fn claim_unsolicited_native<V: Venue, T: Transfers>(
    ctx: &OpContext,
    venue: &V,
    tokens: &T,
) -> Result<Nat> {
    admin::check_not_paused()?;
    let _guard = EntryGuard::acquire("deposit")?;

    if ctx.caller == Principal::anonymous() {
        return Err(VaultError::Validation(ValidationError::InvalidAccount {
            account: ctx.caller.to_text(),
        }));
    }

    let native = constants::native_token()?;
    let amount = tokens.balance_of(native, ctx.self_id).await?;
    if amount == Nat::from(0u64) {
        return Err(VaultError::Validation(ValidationError::InvalidAmount {
            amount: "0".to_string(),
            reason: "No unsolicited native balance to claim".to_string(),
        }));
    }

    // A failure here leaves the balance in place, claimable later; there
    // is no sender to refund to.
    let cfg = config::get();
    let estimate = routing::quote_to_reference(venue, native, &amount).await?;
    let aggregate = ledger::with_store(|store| store.aggregate());
    deposit_validator::validate_deposit_caps(&estimate, &aggregate, &cfg)?;

    ic_cdk::println!(
        "💰 Claiming unsolicited native balance: {} for {}",
        amount,
        ctx.caller.to_text()
    );

    settle_deposit(ctx, native, amount, venue, tokens, None).await
}

/// Convert pulled funds to the reference token and credit the caller.
///
/// `refund_input_to` is where the input asset goes if the conversion
/// itself fails; `None` leaves it in the canister (unsolicited claims).
async fn settle_deposit<V: Venue, T: Transfers>(
    ctx: &OpContext,
    asset: Principal,
    amount: Nat,
    venue: &V,
    tokens: &T,
    refund_input_to: Option<Principal>,
) -> Result<Nat> {
    let reference = constants::reference_token()?;

    let actual = if asset == reference {
        // Identity conversion, nothing to trade
        amount.clone()
    } else {
        match convert_to_reference(ctx, asset, &amount, venue, tokens).await {
            Ok(actual) => actual,
            Err(e) => {
                if let Some(owner) = refund_input_to {
                    refund(tokens, asset, owner, &amount).await;
                }
                return Err(e);
            }
        }
    };

    // Re-check the bank cap with the real amount; execution can beat the
    // estimate. The asset is already in custody, so a breach here refunds
    // the proceeds rather than crediting anyone.
    let cfg = config::get();
    let aggregate = ledger::with_store(|store| store.aggregate());
    if aggregate.clone() + actual.clone() > cfg.bank_cap {
        ic_cdk::println!(
            "⚠️ Post-trade bank cap breach: aggregate {} + actual {} > cap {}",
            aggregate,
            actual,
            cfg.bank_cap
        );
        refund(tokens, reference, ctx.caller, &actual).await;
        return Err(VaultError::Ledger(LedgerError::DepositCapExceeded {
            attempted: actual.to_string(),
            aggregate: aggregate.to_string(),
            cap: cfg.bank_cap.to_string(),
        }));
    }

    ledger::with_store_mut(|store| {
        store.credit(ctx.caller, &actual);
        store.record_deposit();
    });

    crate::_5_INFORMATIONAL::history::record_conversion(ConversionRecord {
        timestamp: ctx.now_ns,
        account: ctx.caller,
        direction: ConversionDirection::Deposit,
        pay_token: asset,
        receive_token: reference,
        pay_amount: amount,
        receive_amount: actual.clone(),
    });

    ic_cdk::println!(
        "✅ Deposit complete: credited {} reference to {}",
        actual,
        ctx.caller.to_text()
    );

    Ok(actual)
}

async fn convert_to_reference<V: Venue, T: Transfers>(
    ctx: &OpContext,
    asset: Principal,
    amount: &Nat,
    venue: &V,
    tokens: &T,
) -> Result<Nat> {
    let reference = constants::reference_token()?;
    let path = routing::resolve_path(venue, asset, reference).await?;
    // Proceeds land in the canister; crediting happens against the ledger
    swaps::execute_swap_exact_in(venue, tokens, amount, &path, ctx.self_id, ctx).await
}

/// Best-effort compensation; a failed refund is logged for manual
/// intervention but does not mask the original error.
async fn refund<T: Transfers>(tokens: &T, token: Principal, to: Principal, amount: &Nat) {
    match tokens.transfer(token, to, amount.clone()).await {
        Ok(_) => {
            ic_cdk::println!("↩️ Refunded {} of {} to {}", amount, token.to_text(), to.to_text());
        }
        Err(e) => {
            ic_cdk::println!(
                "❌ ERROR: refund of {} {} to {} failed: {}. Manual intervention required.",
                amount,
                token.to_text(),
                to.to_text(),
                e
            );
        }
    }
}
