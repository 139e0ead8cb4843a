//! Critical Data - The custody ledger
//! Source of truth for all balances

pub mod ledger;

pub use ledger::{with_store, with_store_mut, BalanceStore};
