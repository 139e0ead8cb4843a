//! Deposit pipeline tests
//!
//! Run the full orchestration natively against the mock venue and mock
//! ledgers. Each test gets fresh thread-local state.

use candid::{Nat, Principal};
use futures::executor::block_on;

use super::*;
use crate::infrastructure::errors::{
    LedgerError, SystemError, TradingError, ValidationError, VaultError,
};
use crate::infrastructure::{admin, constants};
use crate::test_support::{
    install_config, principal, test_ctx, vault_id, MockTransfers, MockVenue, TransferCall,
};
use crate::_2_CRITICAL_DATA::ledger;
use crate::_5_INFORMATIONAL::history;

fn balances_of(account: Principal) -> (Nat, Nat) {
    ledger::with_store(|store| (store.balance_of(account), store.aggregate()))
}

#[test]
fn test_native_deposit_credits_actual_not_estimate() {
    install_config(100_000, 1_000_000);
    let user = principal(1);
    let native = constants::native_token().unwrap();
    let reference = constants::reference_token().unwrap();

    // Quoted 50,000, venue beats the quote and returns 50,500
    let venue = MockVenue::new()
        .with_pair(native, reference)
        .with_quote(Nat::from(50_000u64))
        .with_executed(Nat::from(50_500u64));
    let tokens = MockTransfers::new();

    let credited = block_on(deposit_native(
        &test_ctx(user),
        Nat::from(25_000u64),
        &venue,
        &tokens,
    ))
    .unwrap();

    assert_eq!(credited, Nat::from(50_500u64));

    let (balance, aggregate) = balances_of(user);
    assert_eq!(balance, Nat::from(50_500u64));
    assert_eq!(aggregate, Nat::from(50_500u64));
    assert_eq!(ledger::with_store(|s| s.deposits_completed()), 1);

    // Minimum handed to the venue was 98/100 of the quote
    let swap = venue.last_swap().unwrap();
    assert_eq!(swap.minimum_receive, Nat::from(49_000u64));
    assert_eq!(swap.receive_address, vault_id());

    // Input was pulled from the caller into custody first
    assert!(matches!(
        tokens.calls().first(),
        Some(TransferCall::Pull { token, from, to, amount })
            if *token == native && *from == user && *to == vault_id()
                && *amount == Nat::from(25_000u64)
    ));

    assert_eq!(history::record_count(), 1);
}

#[test]
fn test_reference_deposit_is_identity_conversion() {
    install_config(100_000, 1_000_000);
    let user = principal(2);
    let reference = constants::reference_token().unwrap();

    let venue = MockVenue::new();
    let tokens = MockTransfers::new();

    let credited = block_on(deposit_asset(
        &test_ctx(user),
        reference,
        Nat::from(10_000u64),
        &venue,
        &tokens,
    ))
    .unwrap();

    assert_eq!(credited, Nat::from(10_000u64));
    assert_eq!(venue.swap_count(), 0);

    let (balance, aggregate) = balances_of(user);
    assert_eq!(balance, Nat::from(10_000u64));
    assert_eq!(aggregate, Nat::from(10_000u64));
}

#[test]
fn test_bridged_deposit_routes_through_three_identities() {
    install_config(100_000, 1_000_000);
    let user = principal(3);
    let asset = principal(30);
    let bridge = constants::bridge_token().unwrap();
    let reference = constants::reference_token().unwrap();

    // No direct pair; both bridge legs exist
    let venue = MockVenue::new()
        .with_pair(asset, bridge)
        .with_pair(bridge, reference)
        .with_quote(Nat::from(40_000u64))
        .with_executed(Nat::from(39_500u64));
    let tokens = MockTransfers::new();

    let credited = block_on(deposit_asset(
        &test_ctx(user),
        asset,
        Nat::from(1_000u64),
        &venue,
        &tokens,
    ))
    .unwrap();

    assert_eq!(credited, Nat::from(39_500u64));

    let swap = venue.last_swap().unwrap();
    assert_eq!(swap.path, vec![asset, bridge, reference]);
}

#[test]
fn test_over_cap_estimate_fails_before_any_transfer() {
    install_config(100_000, 1_000_000);
    let user = principal(4);
    let asset = principal(31);
    let reference = constants::reference_token().unwrap();

    let venue = MockVenue::new()
        .with_pair(asset, reference)
        .with_quote(Nat::from(200_000u64));
    let tokens = MockTransfers::new();

    let result = block_on(deposit_asset(
        &test_ctx(user),
        asset,
        Nat::from(1_000u64),
        &venue,
        &tokens,
    ));

    match result {
        Err(VaultError::Validation(ValidationError::TransactionAmountExceeded {
            amount,
            cap,
        })) => {
            assert_eq!(amount, "200000");
            assert_eq!(cap, "100000");
        }
        other => panic!("expected TransactionAmountExceeded, got {:?}", other),
    }

    // Nothing moved and nothing was credited
    assert!(tokens.calls().is_empty());
    let (balance, aggregate) = balances_of(user);
    assert_eq!(balance, Nat::from(0u64));
    assert_eq!(aggregate, Nat::from(0u64));
}

#[test]
fn test_no_trade_path_fails_with_pair_not_found() {
    install_config(100_000, 1_000_000);
    let user = principal(5);
    let asset = principal(32);

    let venue = MockVenue::new().with_quote(Nat::from(1u64));
    let tokens = MockTransfers::new();

    let result = block_on(deposit_asset(
        &test_ctx(user),
        asset,
        Nat::from(1_000u64),
        &venue,
        &tokens,
    ));

    assert!(matches!(
        result,
        Err(VaultError::Trading(TradingError::PairNotFound { .. }))
    ));
    assert!(tokens.calls().is_empty());
}

#[test]
fn test_swap_failure_refunds_pulled_input() {
    install_config(100_000, 1_000_000);
    let user = principal(6);
    let asset = principal(33);
    let reference = constants::reference_token().unwrap();

    // Venue quotes fine but rejects the trade
    let venue = MockVenue::new()
        .with_pair(asset, reference)
        .with_quote(Nat::from(50_000u64));
    let tokens = MockTransfers::new();

    let result = block_on(deposit_asset(
        &test_ctx(user),
        asset,
        Nat::from(1_000u64),
        &venue,
        &tokens,
    ));

    assert!(matches!(
        result,
        Err(VaultError::Trading(TradingError::SwapFailed { .. }))
    ));

    // Pulled, then refunded; no credit observable
    let calls = tokens.calls();
    assert!(matches!(calls.first(), Some(TransferCall::Pull { .. })));
    assert!(calls.iter().any(|call| matches!(
        call,
        TransferCall::Push { token, to, amount }
            if *token == asset && *to == user && *amount == Nat::from(1_000u64)
    )));

    let (balance, aggregate) = balances_of(user);
    assert_eq!(balance, Nat::from(0u64));
    assert_eq!(aggregate, Nat::from(0u64));
    assert_eq!(ledger::with_store(|s| s.deposits_completed()), 0);
}

#[test]
fn test_post_trade_cap_breach_refunds_proceeds() {
    install_config(100_000, 1_000_000);
    let user = principal(7);
    let asset = principal(34);
    let reference = constants::reference_token().unwrap();

    // Existing custody near the cap
    ledger::with_store_mut(|store| store.credit(principal(8), &Nat::from(960_000u64)));

    // Estimate passes (960k + 30k <= 1M) but execution beats the quote
    // enough to breach (960k + 50k > 1M)
    let venue = MockVenue::new()
        .with_pair(asset, reference)
        .with_quote(Nat::from(30_000u64))
        .with_executed(Nat::from(50_000u64));
    let tokens = MockTransfers::new();

    let result = block_on(deposit_asset(
        &test_ctx(user),
        asset,
        Nat::from(1_000u64),
        &venue,
        &tokens,
    ));

    assert!(matches!(
        result,
        Err(VaultError::Ledger(LedgerError::DepositCapExceeded { .. }))
    ));

    // Proceeds were refunded in the reference token, nobody was credited
    assert!(tokens.calls().iter().any(|call| matches!(
        call,
        TransferCall::Push { token, to, amount }
            if *token == reference && *to == user && *amount == Nat::from(50_000u64)
    )));

    let (balance, aggregate) = balances_of(user);
    assert_eq!(balance, Nat::from(0u64));
    assert_eq!(aggregate, Nat::from(960_000u64));
}

#[test]
fn test_deposit_fails_while_paused() {
    install_config(100_000, 1_000_000);
    admin::set_pause(true);

    let venue = MockVenue::new();
    let tokens = MockTransfers::new();

    let result = block_on(deposit_native(
        &test_ctx(principal(9)),
        Nat::from(1u64),
        &venue,
        &tokens,
    ));

    assert!(matches!(
        result,
        Err(VaultError::System(SystemError::Paused))
    ));
    assert!(tokens.calls().is_empty());

    // Reset for other tests
    admin::set_pause(false);
}

#[test]
fn test_claim_unsolicited_native_credits_caller() {
    install_config(100_000, 1_000_000);
    let claimer = principal(10);
    let native = constants::native_token().unwrap();
    let reference = constants::reference_token().unwrap();

    let venue = MockVenue::new()
        .with_pair(native, reference)
        .with_quote(Nat::from(50_000u64))
        .with_executed(Nat::from(50_000u64));
    let tokens = MockTransfers::new().with_native_balance(Nat::from(25_000u64));

    let credited =
        block_on(claim_unsolicited_native(&test_ctx(claimer), &venue, &tokens)).unwrap();

    assert_eq!(credited, Nat::from(50_000u64));

    let (balance, _) = balances_of(claimer);
    assert_eq!(balance, Nat::from(50_000u64));

    // Funds were already in the canister: approved for the venue but
    // never pulled from the claimer
    assert!(tokens
        .calls()
        .iter()
        .all(|call| !matches!(call, TransferCall::Pull { .. })));
}

#[test]
fn test_claim_unsolicited_native_with_empty_balance_fails() {
    install_config(100_000, 1_000_000);

    let venue = MockVenue::new();
    let tokens = MockTransfers::new();

    let result = block_on(claim_unsolicited_native(
        &test_ctx(principal(11)),
        &venue,
        &tokens,
    ));

    assert!(matches!(
        result,
        Err(VaultError::Validation(ValidationError::InvalidAmount { .. }))
    ));
}

#[test]
fn test_aggregate_equals_sum_of_balances_after_deposits() {
    install_config(100_000, 1_000_000);
    let native = constants::native_token().unwrap();
    let reference = constants::reference_token().unwrap();

    let venue = MockVenue::new()
        .with_pair(native, reference)
        .with_quote(Nat::from(20_000u64))
        .with_executed(Nat::from(19_800u64));
    let tokens = MockTransfers::new();

    for n in 20..23u8 {
        block_on(deposit_native(
            &test_ctx(principal(n)),
            Nat::from(10_000u64),
            &venue,
            &tokens,
        ))
        .unwrap();
    }

    ledger::with_store(|store| {
        assert_eq!(store.aggregate(), store.sum_of_balances());
        assert_eq!(store.aggregate(), Nat::from(59_400u64));
        assert_eq!(store.deposits_completed(), 3);
    });
}
