//! Vault Backend - Custodial conversion vault with numbered zones
//!
//! Accepts deposits of arbitrary ICRC tokens, converts each one into the
//! ckUSDT reference token on an external swap venue, and pays
//! withdrawals either directly or converted back into a token of the
//! caller's choice.
//!
//! Architecture:
//! 1_CRITICAL_OPERATIONS - Deposits, withdrawals (highest security)
//! 2_CRITICAL_DATA - The custody ledger
//! 3_VENUE_ROUTING - Venue seam, trade-path resolution
//! 4_TRADING_EXECUTION - Swaps, slippage, token movement
//! 5_INFORMATIONAL - Estimates, status, history
//! 6_INFRASTRUCTURE - Errors, math, guards, admin, config

// Import numbered modules with explicit paths
#[path = "1_CRITICAL_OPERATIONS/mod.rs"]
mod critical_operations_1;
use critical_operations_1 as _1_CRITICAL_OPERATIONS;

#[path = "2_CRITICAL_DATA/mod.rs"]
mod critical_data_2;
use critical_data_2 as _2_CRITICAL_DATA;

#[path = "3_VENUE_ROUTING/mod.rs"]
mod venue_routing_3;
use venue_routing_3 as _3_VENUE_ROUTING;

#[path = "4_TRADING_EXECUTION/mod.rs"]
mod trading_execution_4;
use trading_execution_4 as _4_TRADING_EXECUTION;

#[path = "5_INFORMATIONAL/mod.rs"]
mod informational_5;
use informational_5 as _5_INFORMATIONAL;

#[path = "6_INFRASTRUCTURE/mod.rs"]
mod infrastructure_6;
use infrastructure_6 as infrastructure;

mod types;

#[cfg(test)]
mod test_support;

use candid::{candid_method, Nat, Principal};
use ic_cdk::{init, post_upgrade, pre_upgrade, query, update};

use infrastructure::{config, Result};
use types::{ConversionRecord, InitArgs, OpContext, Role, VaultStatus};
use _1_CRITICAL_OPERATIONS::{deposits, withdrawals};
use _3_VENUE_ROUTING::venue::SwapVenue;
use _4_TRADING_EXECUTION::transfers::IcrcTransfers;

// ===== DEPOSITS =====

#[update]
#[candid_method(update)]
async fn deposit_native(amount: Nat) -> Result<Nat> {
    let ctx = OpContext::current();
    let venue = SwapVenue::from_config()?;
    deposits::deposit_native(&ctx, amount, &venue, &IcrcTransfers).await
}

#[update]
#[candid_method(update)]
async fn deposit_asset(asset: Principal, amount: Nat) -> Result<Nat> {
    let ctx = OpContext::current();
    let venue = SwapVenue::from_config()?;
    deposits::deposit_asset(&ctx, asset, amount, &venue, &IcrcTransfers).await
}

/// Convert native tokens sent straight to the canister into a deposit
/// credited to the caller. The ledger does not expose the sender of a
/// bare transfer, so whoever claims first is credited.
#[update]
#[candid_method(update)]
async fn claim_unsolicited_native() -> Result<Nat> {
    let ctx = OpContext::current();
    let venue = SwapVenue::from_config()?;
    deposits::claim_unsolicited_native(&ctx, &venue, &IcrcTransfers).await
}

// ===== WITHDRAWALS =====

#[update]
#[candid_method(update)]
async fn withdraw_reference(amount: Nat) -> Result<Nat> {
    let ctx = OpContext::current();
    withdrawals::withdraw_reference(&ctx, amount, &IcrcTransfers).await
}

#[update]
#[candid_method(update)]
async fn withdraw_as_native(amount: Nat) -> Result<Nat> {
    let ctx = OpContext::current();
    let venue = SwapVenue::from_config()?;
    withdrawals::withdraw_as_native(&ctx, amount, &venue, &IcrcTransfers).await
}

#[update]
#[candid_method(update)]
async fn withdraw_as_asset(amount: Nat, asset: Principal) -> Result<Nat> {
    let ctx = OpContext::current();
    let venue = SwapVenue::from_config()?;
    withdrawals::withdraw_as_asset(&ctx, amount, asset, &venue, &IcrcTransfers).await
}

// ===== QUERIES & ESTIMATES =====

#[query]
#[candid_method(query)]
fn query_balance(account: Principal) -> Nat {
    _2_CRITICAL_DATA::ledger::with_store(|store| store.balance_of(account))
}

#[query]
#[candid_method(query)]
fn get_vault_status() -> VaultStatus {
    _5_INFORMATIONAL::display::get_vault_status()
}

// Estimates quote the venue, which is an inter-canister call; they
// cannot be #[query] even though they change no state.

#[update]
#[candid_method(update)]
async fn estimate_deposit(asset: Principal, amount: Nat) -> Result<Nat> {
    let venue = SwapVenue::from_config()?;
    _5_INFORMATIONAL::display::estimate_deposit(&venue, asset, &amount).await
}

#[update]
#[candid_method(update)]
async fn estimate_withdraw_native(amount: Nat) -> Result<Nat> {
    let venue = SwapVenue::from_config()?;
    _5_INFORMATIONAL::display::estimate_withdraw_native(&venue, &amount).await
}

#[update]
#[candid_method(update)]
async fn estimate_withdraw_asset(amount: Nat, asset: Principal) -> Result<Nat> {
    let venue = SwapVenue::from_config()?;
    _5_INFORMATIONAL::display::estimate_withdraw_asset(&venue, &amount, asset).await
}

// ===== HISTORY =====

/// Full conversion history (bounded, newest last)
#[query]
#[candid_method(query)]
fn get_conversion_history() -> Vec<ConversionRecord> {
    _5_INFORMATIONAL::history::get_full_history()
}

/// Paginated conversion history
#[query]
#[candid_method(query)]
fn get_conversion_history_paginated(offset: u64, limit: u64) -> (Vec<ConversionRecord>, u64) {
    let full_history = _5_INFORMATIONAL::history::get_full_history();
    let total = full_history.len() as u64;

    let start = offset as usize;
    let end = std::cmp::min(start + (limit as usize), full_history.len());

    let page = if start < full_history.len() {
        full_history[start..end].to_vec()
    } else {
        Vec::new()
    };

    (page, total)
}

// ===== ACCESS CONTROL =====

#[update]
#[candid_method(update)]
fn add_admin(account: Principal) -> Result<()> {
    let caller = ic_cdk::caller();
    infrastructure::grant_role(caller, account, Role::Admin)?;
    infrastructure::log_admin_action(format!(
        "ROLE_GRANTED:{}:{}",
        Role::Admin.as_str(),
        account
    ));
    Ok(())
}

#[query]
#[candid_method(query)]
fn has_role(account: Principal, role: Role) -> bool {
    infrastructure::has_role(account, role)
}

/// Rotate the swap venue reference (admin only). Caps stay immutable.
#[update]
#[candid_method(update)]
fn set_venue(venue: Principal) -> Result<()> {
    infrastructure::require_admin(ic_cdk::caller())?;
    config::set_venue_canister(venue)?;
    infrastructure::log_admin_action(format!("VENUE_ROTATED:{}", venue));
    Ok(())
}

// ===== ADMIN CONTROLS =====

/// Emergency pause - stops all deposits and withdrawals
#[update]
#[candid_method(update)]
fn emergency_pause() -> Result<()> {
    infrastructure::require_admin(ic_cdk::caller())?;
    infrastructure::set_pause(true);
    infrastructure::log_admin_action("EMERGENCY_PAUSE_ACTIVATED".to_string());
    ic_cdk::println!("🚨 EMERGENCY PAUSE ACTIVATED");
    Ok(())
}

/// Resume operations after emergency pause
#[update]
#[candid_method(update)]
fn emergency_unpause() -> Result<()> {
    infrastructure::require_admin(ic_cdk::caller())?;
    infrastructure::set_pause(false);
    infrastructure::log_admin_action("EMERGENCY_PAUSE_DEACTIVATED".to_string());
    ic_cdk::println!("✅ EMERGENCY PAUSE DEACTIVATED");
    Ok(())
}

#[query]
#[candid_method(query)]
fn is_emergency_paused() -> bool {
    infrastructure::is_paused()
}

/// Get admin action log (admin only)
#[query]
#[candid_method(query)]
fn get_admin_action_log() -> Result<Vec<infrastructure::AdminAction>> {
    infrastructure::require_admin(ic_cdk::caller())?;
    Ok(infrastructure::get_admin_log())
}

#[query]
#[candid_method(query)]
fn get_canister_id() -> Principal {
    ic_cdk::id()
}

// ===== INITIALIZATION =====

#[init]
fn init(args: InitArgs) {
    let deployer = ic_cdk::caller();

    config::install(config::Config::from_init(&args));
    infrastructure::admin::bootstrap_roles(deployer, args.admin);

    ic_cdk::println!("===================================");
    ic_cdk::println!("Vault Backend Initialized");
    ic_cdk::println!("Root: {}", deployer);
    ic_cdk::println!("Admin: {}", args.admin);
    ic_cdk::println!("===================================");
}

#[pre_upgrade]
fn pre_upgrade() {
    ic_cdk::println!("===================================");
    ic_cdk::println!("Vault Backend Pre-Upgrade");
    ic_cdk::println!("===================================");

    infrastructure::stable_storage::save_state();
}

#[post_upgrade]
fn post_upgrade() {
    ic_cdk::println!("===================================");
    ic_cdk::println!("Vault Backend Post-Upgrade");
    ic_cdk::println!("===================================");

    infrastructure::stable_storage::restore_state();

    ic_cdk::println!("✅ Backend upgraded successfully");
}

// ===== CANDID EXPORT =====

ic_cdk::export_candid!();
