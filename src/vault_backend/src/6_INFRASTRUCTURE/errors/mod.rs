//! Error taxonomy for the vault
//!
//! Every failure aborts the whole request; variants carry the offending
//! values as strings so clients can render precise messages. All types
//! cross the candid boundary.

use candid::{CandidType, Deserialize};
use serde::Serialize;
use std::fmt;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum VaultError {
    Validation(ValidationError),
    Ledger(LedgerError),
    Trading(TradingError),
    Transfer(TransferError),
    Auth(AuthError),
    System(SystemError),
    Calculation(CalculationError),
    Other(String),
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    InvalidAmount {
        amount: String,
        reason: String,
    },
    InvalidAsset {
        asset: String,
        reason: String,
    },
    InvalidAccount {
        account: String,
    },
    /// Single-operation value above the per-transaction cap.
    TransactionAmountExceeded {
        amount: String,
        cap: String,
    },
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    InsufficientBalance {
        requested: String,
        available: String,
    },
    /// Aggregate custody would pass the bank cap. Checked against the
    /// estimate before the trade and against the real amount after it.
    DepositCapExceeded {
        attempted: String,
        aggregate: String,
        cap: String,
    },
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum TradingError {
    PairNotFound {
        pay_token: String,
        receive_token: String,
    },
    SwapFailed {
        pay_token: String,
        receive_token: String,
        amount: String,
        reason: String,
    },
    SlippageExceeded {
        expected: String,
        actual: String,
        minimum: String,
    },
    VenueError {
        operation: String,
        message: String,
    },
    InvalidSwapParams {
        reason: String,
    },
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum TransferError {
    TransferFailed {
        token: String,
        amount: String,
        reason: String,
    },
    ApprovalFailed {
        token: String,
        amount: String,
        reason: String,
    },
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum AuthError {
    CallerNotAdmin { caller: String },
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum SystemError {
    /// A guarded entry point was reentered while a request was in flight.
    OperationInProgress { operation: String },
    Paused,
    StateCorrupted { reason: String },
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum CalculationError {
    DivisionByZero { operation: String },
    Overflow { operation: String },
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultError::Validation(e) => write!(f, "Validation error: {}", e),
            VaultError::Ledger(e) => write!(f, "Ledger error: {}", e),
            VaultError::Trading(e) => write!(f, "Trading error: {}", e),
            VaultError::Transfer(e) => write!(f, "Transfer error: {}", e),
            VaultError::Auth(e) => write!(f, "Authorization error: {}", e),
            VaultError::System(e) => write!(f, "System error: {}", e),
            VaultError::Calculation(e) => write!(f, "Calculation error: {}", e),
            VaultError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidAmount { amount, reason } => {
                write!(f, "Invalid amount {}: {}", amount, reason)
            }
            ValidationError::InvalidAsset { asset, reason } => {
                write!(f, "Invalid asset {}: {}", asset, reason)
            }
            ValidationError::InvalidAccount { account } => {
                write!(f, "Invalid account {}", account)
            }
            ValidationError::TransactionAmountExceeded { amount, cap } => {
                write!(
                    f,
                    "Transaction amount {} exceeds per-transaction cap {}",
                    amount, cap
                )
            }
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InsufficientBalance {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Insufficient balance: requested {}, available {}",
                    requested, available
                )
            }
            LedgerError::DepositCapExceeded {
                attempted,
                aggregate,
                cap,
            } => {
                write!(
                    f,
                    "Deposit cap exceeded: attempted {}, aggregate {}, cap {}",
                    attempted, aggregate, cap
                )
            }
        }
    }
}

impl fmt::Display for TradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingError::PairNotFound {
                pay_token,
                receive_token,
            } => {
                write!(f, "No trade path from {} to {}", pay_token, receive_token)
            }
            TradingError::SwapFailed {
                pay_token,
                receive_token,
                amount,
                reason,
            } => {
                write!(
                    f,
                    "Swap of {} {} for {} failed: {}",
                    amount, pay_token, receive_token, reason
                )
            }
            TradingError::SlippageExceeded {
                expected,
                actual,
                minimum,
            } => {
                write!(
                    f,
                    "Slippage exceeded: expected {}, got {}, minimum {}",
                    expected, actual, minimum
                )
            }
            TradingError::VenueError { operation, message } => {
                write!(f, "Venue {} failed: {}", operation, message)
            }
            TradingError::InvalidSwapParams { reason } => {
                write!(f, "Invalid swap parameters: {}", reason)
            }
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::TransferFailed {
                token,
                amount,
                reason,
            } => {
                write!(f, "Transfer of {} {} failed: {}", amount, token, reason)
            }
            TransferError::ApprovalFailed {
                token,
                amount,
                reason,
            } => {
                write!(f, "Approval of {} {} failed: {}", amount, token, reason)
            }
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::CallerNotAdmin { caller } => {
                write!(f, "Caller {} is not an admin", caller)
            }
        }
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::OperationInProgress { operation } => {
                write!(f, "Operation {} already in progress", operation)
            }
            SystemError::Paused => write!(f, "System is emergency paused"),
            SystemError::StateCorrupted { reason } => {
                write!(f, "State corrupted: {}", reason)
            }
        }
    }
}

impl fmt::Display for CalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationError::DivisionByZero { operation } => {
                write!(f, "Division by zero in {}", operation)
            }
            CalculationError::Overflow { operation } => {
                write!(f, "Overflow in {}", operation)
            }
        }
    }
}
