//! Withdrawal pipeline
//!
//! Pays out a reference-token balance, either directly or converted to
//! the caller's chosen token. The debit happens BEFORE the venue
//! interaction so a reentrant callback cannot spend the same balance
//! twice; any failure after the debit restores it before the error
//! propagates. The caller receives whatever the trade actually returns,
//! while their ledger balance drops by exactly the requested amount.

pub mod withdrawal_validator;


use candid::{Nat, Principal};

use crate::infrastructure::errors::Result;
use crate::infrastructure::{admin, config, constants, EntryGuard};
use crate::types::{ConversionDirection, ConversionRecord, OpContext};
use crate::_2_CRITICAL_DATA::ledger;
use crate::_3_VENUE_ROUTING::routing;
use crate::_3_VENUE_ROUTING::venue::Venue;
use crate::_4_TRADING_EXECUTION::swaps;
use crate::_4_TRADING_EXECUTION::transfers::Transfers;

/// Withdraw `amount` of the reference token directly. Returns the amount
/// paid out (always the requested amount).
pub async fn withdraw_reference<T: Transfers>(
    ctx: &OpContext,
    amount: Nat,
    tokens: &T,
) -> Result<Nat> {
    admin::check_not_paused()?;
    let _guard = EntryGuard::acquire("withdraw")?;

    let reference = constants::reference_token()?;
    debit_checked(ctx, &amount)?;

    // Effects before interaction: balance is already gone if the payout
    // reenters. Restore it on failure.
    match tokens.transfer(reference, ctx.caller, amount.clone()).await {
        Ok(_) => {
            finish_withdrawal(ctx, reference, &amount, &amount);
            Ok(amount)
        }
        Err(e) => {
            restore_debit(ctx, &amount);
            Err(e)
        }
    }
}

/// Withdraw `amount` of reference value converted to the native token.
pub async fn withdraw_as_native<V: Venue, T: Transfers>(
    ctx: &OpContext,
    amount: Nat,
    venue: &V,
    tokens: &T,
) -> Result<Nat> {
    let native = constants::native_token()?;
    withdraw_as_asset(ctx, amount, native, venue, tokens).await
}

/// Withdraw `amount` of reference value converted to `asset`. The venue
/// delivers the output straight to the caller; the return value is what
/// the trade actually produced.
pub async fn withdraw_as_asset<V: Venue, T: Transfers>(
    ctx: &OpContext,
    amount: Nat,
    asset: Principal,
    venue: &V,
    tokens: &T,
) -> Result<Nat> {
    let reference = constants::reference_token()?;
    if asset == reference {
        return withdraw_reference(ctx, amount, tokens).await;
    }

    admin::check_not_paused()?;
    let _guard = EntryGuard::acquire("withdraw")?;

    debit_checked(ctx, &amount)?;

    match convert_from_reference(ctx, &amount, asset, venue, tokens).await {
        Ok(actual) => {
            finish_withdrawal(ctx, asset, &amount, &actual);
            Ok(actual)
        }
        Err(e) => {
            restore_debit(ctx, &amount);
            Err(e)
        }
    }
}

/// Validate against the live balance, then debit ledger and aggregate.
fn debit_checked(ctx: &OpContext, amount: &Nat) -> Result<()> {
    let cfg = config::get();
    let available = ledger::with_store(|store| store.balance_of(ctx.caller));
    withdrawal_validator::validate_withdrawal_request(ctx.caller, amount, &available, &cfg)?;

    ic_cdk::println!(
        "💸 Withdrawal: {} reference from {} (balance {})",
        amount,
        ctx.caller.to_text(),
        available
    );

    ledger::with_store_mut(|store| store.debit(ctx.caller, amount))
}

async fn convert_from_reference<V: Venue, T: Transfers>(
    ctx: &OpContext,
    amount: &Nat,
    asset: Principal,
    venue: &V,
    tokens: &T,
) -> Result<Nat> {
    let reference = constants::reference_token()?;
    let path = routing::resolve_path(venue, reference, asset).await?;
    swaps::execute_swap_exact_in(venue, tokens, amount, &path, ctx.caller, ctx).await
}

fn restore_debit(ctx: &OpContext, amount: &Nat) {
    ledger::with_store_mut(|store| store.credit(ctx.caller, amount));
    ic_cdk::println!(
        "↩️ Withdrawal failed, restored {} reference to {}",
        amount,
        ctx.caller.to_text()
    );
}

fn finish_withdrawal(ctx: &OpContext, receive_token: Principal, debited: &Nat, actual: &Nat) {
    let reference = match constants::reference_token() {
        Ok(reference) => reference,
        Err(_) => receive_token,
    };

    ledger::with_store_mut(|store| store.record_withdrawal());

    crate::_5_INFORMATIONAL::history::record_conversion(ConversionRecord {
        timestamp: ctx.now_ns,
        account: ctx.caller,
        direction: ConversionDirection::Withdrawal,
        pay_token: reference,
        receive_token,
        pay_amount: debited.clone(),
        receive_amount: actual.clone(),
    });

    ic_cdk::println!(
        "✅ Withdrawal complete: {} debited, {} {} delivered to {}",
        debited,
        actual,
        receive_token.to_text(),
        ctx.caller.to_text()
    );
}
