//! Infrastructure - Shared utilities and types
//! Foundation layer for all other modules

pub mod admin;
pub mod config;
pub mod constants;
pub mod errors;
pub mod math;
pub mod reentrancy;
pub mod stable_storage;

// Re-export commonly used items
pub use constants::*;
pub use errors::{
    AuthError, CalculationError, LedgerError, Result, SystemError, TradingError, TransferError,
    ValidationError, VaultError,
};
pub use math::multiply_and_divide;
pub use reentrancy::EntryGuard;
pub use admin::{
    check_not_paused, get_admin_log, grant_role, has_role, is_paused, log_admin_action,
    require_admin, set_pause, AdminAction,
};
