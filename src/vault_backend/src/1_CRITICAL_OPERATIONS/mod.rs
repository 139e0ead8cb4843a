//! Critical Operations - Deposits and withdrawals
//! Highest-security zone; every entry here mutates custody state

pub mod deposits;
pub mod withdrawals;
