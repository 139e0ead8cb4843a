//! The custody ledger
//!
//! Sole owner of account balances and the aggregate total. Everything
//! else reads through the queries here and mutates only via
//! `credit`/`debit`, which move the per-account balance and the
//! aggregate together so `aggregate == Σ balances` holds by
//! construction after every settled request.

use std::cell::RefCell;
use std::collections::HashMap;

use candid::{Nat, Principal};

use crate::infrastructure::errors::{LedgerError, Result, SystemError, VaultError};

pub struct BalanceStore {
    balances: HashMap<Principal, Nat>,
    aggregate: Nat,
    deposits_completed: u64,
    withdrawals_completed: u64,
}

impl Default for BalanceStore {
    fn default() -> Self {
        Self {
            balances: HashMap::new(),
            aggregate: Nat::from(0u64),
            deposits_completed: 0,
            withdrawals_completed: 0,
        }
    }
}

impl BalanceStore {
    /// Add `amount` of the reference token to `account`'s balance and to
    /// the aggregate total.
    pub fn credit(&mut self, account: Principal, amount: &Nat) {
        let balance = self.balance_of(account);
        self.balances.insert(account, balance + amount.clone());
        self.aggregate = self.aggregate.clone() + amount.clone();
    }

    /// Remove `amount` from `account`'s balance and the aggregate total.
    pub fn debit(&mut self, account: Principal, amount: &Nat) -> Result<()> {
        let available = self.balance_of(account);
        if amount > &available {
            return Err(VaultError::Ledger(LedgerError::InsufficientBalance {
                requested: amount.to_string(),
                available: available.to_string(),
            }));
        }

        if amount > &self.aggregate {
            // Unreachable while the credit/debit invariant holds
            return Err(VaultError::System(SystemError::StateCorrupted {
                reason: format!(
                    "aggregate {} below account balance being debited ({})",
                    self.aggregate, amount
                ),
            }));
        }

        let remaining = available - amount.clone();
        if remaining == Nat::from(0u64) {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, remaining);
        }
        self.aggregate = self.aggregate.clone() - amount.clone();

        Ok(())
    }

    pub fn balance_of(&self, account: Principal) -> Nat {
        self.balances
            .get(&account)
            .cloned()
            .unwrap_or_else(|| Nat::from(0u64))
    }

    pub fn aggregate(&self) -> Nat {
        self.aggregate.clone()
    }

    pub fn record_deposit(&mut self) {
        self.deposits_completed += 1;
    }

    pub fn record_withdrawal(&mut self) {
        self.withdrawals_completed += 1;
    }

    pub fn deposits_completed(&self) -> u64 {
        self.deposits_completed
    }

    pub fn withdrawals_completed(&self) -> u64 {
        self.withdrawals_completed
    }

    /// Recompute Σ balances from scratch (tests and diagnostics).
    pub fn sum_of_balances(&self) -> Nat {
        let mut sum = Nat::from(0u64);
        for balance in self.balances.values() {
            sum = sum + balance.clone();
        }
        sum
    }
}

thread_local! {
    static STORE: RefCell<BalanceStore> = RefCell::new(BalanceStore::default());
}

pub fn with_store<R>(f: impl FnOnce(&BalanceStore) -> R) -> R {
    STORE.with(|store| f(&store.borrow()))
}

pub fn with_store_mut<R>(f: impl FnOnce(&mut BalanceStore) -> R) -> R {
    STORE.with(|store| f(&mut store.borrow_mut()))
}

// === STABLE STORAGE EXPORT/IMPORT ===

pub struct LedgerSnapshot {
    pub balances: Vec<(Principal, Nat)>,
    pub aggregate_balance: Nat,
    pub deposits_completed: u64,
    pub withdrawals_completed: u64,
}

pub fn export_state() -> LedgerSnapshot {
    with_store(|store| LedgerSnapshot {
        balances: store
            .balances
            .iter()
            .map(|(account, balance)| (*account, balance.clone()))
            .collect(),
        aggregate_balance: store.aggregate.clone(),
        deposits_completed: store.deposits_completed,
        withdrawals_completed: store.withdrawals_completed,
    })
}

pub fn import_state(
    balances: Vec<(Principal, Nat)>,
    aggregate_balance: Nat,
    deposits_completed: u64,
    withdrawals_completed: u64,
) {
    with_store_mut(|store| {
        store.balances = balances.into_iter().collect();
        store.aggregate = aggregate_balance;
        store.deposits_completed = deposits_completed;
        store.withdrawals_completed = withdrawals_completed;
    });
}
