//! Test doubles for the conversion pipeline
//!
//! The mock venue and mock transfers let the whole deposit/withdrawal
//! flow run natively: they simulate quotes, slippage, venue rejections
//! and reentrant callbacks without an IC runtime.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use candid::{Nat, Principal};

use crate::infrastructure::config::{self, Config};
use crate::infrastructure::errors::{Result, TradingError, TransferError, VaultError};
use crate::types::venue::SwapExactInArgs;
use crate::types::OpContext;
use crate::_3_VENUE_ROUTING::venue::Venue;
use crate::_4_TRADING_EXECUTION::transfers::Transfers;

pub fn principal(n: u8) -> Principal {
    Principal::from_slice(&[n; 8])
}

/// The canister's own identity in tests.
pub fn vault_id() -> Principal {
    principal(200)
}

pub fn test_ctx(caller: Principal) -> OpContext {
    OpContext {
        caller,
        self_id: vault_id(),
        now_ns: 1_700_000_000_000_000_000,
    }
}

pub fn test_config(per_transaction_cap: u64, bank_cap: u64) -> Config {
    Config {
        per_transaction_cap: Nat::from(per_transaction_cap),
        bank_cap: Nat::from(bank_cap),
        admin: principal(250),
    }
}

pub fn install_config(per_transaction_cap: u64, bank_cap: u64) {
    config::install(test_config(per_transaction_cap, bank_cap));
}

// === MOCK VENUE ===

pub struct MockVenue {
    venue_id: Principal,
    pairs: Vec<(Principal, Principal)>,
    quote: Option<Nat>,
    executed: Option<Nat>,
    swaps: RefCell<Vec<SwapExactInArgs>>,
    reenter_as: Cell<Option<Principal>>,
    reentry_result: RefCell<Option<Result<Nat>>>,
}

impl MockVenue {
    pub fn new() -> Self {
        Self {
            venue_id: principal(210),
            pairs: Vec::new(),
            quote: None,
            executed: None,
            swaps: RefCell::new(Vec::new()),
            reenter_as: Cell::new(None),
            reentry_result: RefCell::new(None),
        }
    }

    pub fn with_pair(mut self, a: Principal, b: Principal) -> Self {
        self.pairs.push((a, b));
        self
    }

    /// Quoted output for any path (last element of `get_amounts_out`).
    pub fn with_quote(mut self, quote: Nat) -> Self {
        self.quote = Some(quote);
        self
    }

    /// Amount the swap actually delivers. Without this every swap is
    /// rejected by the venue.
    pub fn with_executed(mut self, executed: Nat) -> Self {
        self.executed = Some(executed);
        self
    }

    /// Make the swap call back into a guarded entry point as `caller`
    /// before returning, like a malicious venue would.
    pub fn with_reentry(self, caller: Principal) -> Self {
        self.reenter_as.set(Some(caller));
        self
    }

    pub fn last_swap(&self) -> Option<SwapExactInArgs> {
        self.swaps.borrow().last().cloned()
    }

    pub fn swap_count(&self) -> usize {
        self.swaps.borrow().len()
    }

    /// Outcome of the reentrant callback, if one was made.
    pub fn reentry_result(&self) -> Option<Result<Nat>> {
        self.reentry_result.borrow().clone()
    }

    fn has_pair(&self, a: Principal, b: Principal) -> bool {
        self.pairs
            .iter()
            .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
    }
}

#[async_trait(?Send)]
impl Venue for MockVenue {
    fn id(&self) -> Principal {
        self.venue_id
    }

    async fn resolve_pair(
        &self,
        token_a: Principal,
        token_b: Principal,
    ) -> Result<Option<String>> {
        if self.has_pair(token_a, token_b) {
            Ok(Some(format!("{}:{}", token_a.to_text(), token_b.to_text())))
        } else {
            Ok(None)
        }
    }

    async fn get_amounts_out(&self, amount_in: &Nat, path: &[Principal]) -> Result<Vec<Nat>> {
        let quote = self.quote.clone().ok_or_else(|| {
            VaultError::Trading(TradingError::VenueError {
                operation: "get_amounts_out".to_string(),
                message: "no quote configured".to_string(),
            })
        })?;

        let mut amounts = vec![amount_in.clone()];
        for _ in 1..path.len() {
            amounts.push(quote.clone());
        }
        Ok(amounts)
    }

    async fn swap_exact_in(&self, args: SwapExactInArgs) -> Result<Vec<Nat>> {
        self.swaps.borrow_mut().push(args.clone());

        if let Some(caller) = self.reenter_as.take() {
            let ctx = test_ctx(caller);
            let inner = crate::_1_CRITICAL_OPERATIONS::withdrawals::withdraw_reference(
                &ctx,
                Nat::from(1u64),
                &MockTransfers::new(),
            )
            .await;
            *self.reentry_result.borrow_mut() = Some(inner);
        }

        let pay_token = args.path.first().copied().unwrap_or(self.venue_id);
        let receive_token = args.path.last().copied().unwrap_or(self.venue_id);

        match &self.executed {
            Some(actual) if actual >= &args.minimum_receive => {
                let mut amounts = vec![args.pay_amount.clone()];
                for _ in 1..args.path.len() {
                    amounts.push(actual.clone());
                }
                Ok(amounts)
            }
            Some(actual) => Err(VaultError::Trading(TradingError::SwapFailed {
                pay_token: pay_token.to_text(),
                receive_token: receive_token.to_text(),
                amount: args.pay_amount.to_string(),
                reason: format!(
                    "output {} below requested minimum {}",
                    actual, args.minimum_receive
                ),
            })),
            None => Err(VaultError::Trading(TradingError::SwapFailed {
                pay_token: pay_token.to_text(),
                receive_token: receive_token.to_text(),
                amount: args.pay_amount.to_string(),
                reason: "insufficient liquidity".to_string(),
            })),
        }
    }
}

// === MOCK TRANSFERS ===

#[derive(Clone, Debug, PartialEq)]
pub enum TransferCall {
    Push {
        token: Principal,
        to: Principal,
        amount: Nat,
    },
    Pull {
        token: Principal,
        from: Principal,
        to: Principal,
        amount: Nat,
    },
    Approve {
        token: Principal,
        spender: Principal,
        amount: Nat,
    },
}

pub struct MockTransfers {
    calls: RefCell<Vec<TransferCall>>,
    fail_transfer: Cell<bool>,
    fail_transfer_from: Cell<bool>,
    native_balance: RefCell<Nat>,
}

impl MockTransfers {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_transfer: Cell::new(false),
            fail_transfer_from: Cell::new(false),
            native_balance: RefCell::new(Nat::from(0u64)),
        }
    }

    pub fn failing_transfer(self) -> Self {
        self.fail_transfer.set(true);
        self
    }

    pub fn failing_transfer_from(self) -> Self {
        self.fail_transfer_from.set(true);
        self
    }

    /// Canister-held native balance reported by `balance_of`.
    pub fn with_native_balance(self, balance: Nat) -> Self {
        *self.native_balance.borrow_mut() = balance;
        self
    }

    pub fn calls(&self) -> Vec<TransferCall> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transfers for MockTransfers {
    async fn transfer(&self, token: Principal, to: Principal, amount: Nat) -> Result<Nat> {
        self.calls.borrow_mut().push(TransferCall::Push {
            token,
            to,
            amount: amount.clone(),
        });

        if self.fail_transfer.get() {
            return Err(VaultError::Transfer(TransferError::TransferFailed {
                token: token.to_text(),
                amount: amount.to_string(),
                reason: "ledger rejected the transfer".to_string(),
            }));
        }
        Ok(Nat::from(1u64))
    }

    async fn transfer_from(
        &self,
        token: Principal,
        from: Principal,
        to: Principal,
        amount: Nat,
    ) -> Result<Nat> {
        self.calls.borrow_mut().push(TransferCall::Pull {
            token,
            from,
            to,
            amount: amount.clone(),
        });

        if self.fail_transfer_from.get() {
            return Err(VaultError::Transfer(TransferError::TransferFailed {
                token: token.to_text(),
                amount: amount.to_string(),
                reason: "insufficient allowance".to_string(),
            }));
        }
        Ok(Nat::from(1u64))
    }

    async fn approve(&self, token: Principal, spender: Principal, amount: Nat) -> Result<Nat> {
        self.calls.borrow_mut().push(TransferCall::Approve {
            token,
            spender,
            amount,
        });
        Ok(Nat::from(1u64))
    }

    async fn balance_of(&self, _token: Principal, _account: Principal) -> Result<Nat> {
        Ok(self.native_balance.borrow().clone())
    }
}
