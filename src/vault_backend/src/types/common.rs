use candid::{CandidType, Deserialize, Nat, Principal};
use serde::Serialize;

/// Install-time arguments. Caps fall back to the compiled defaults when
/// omitted; the admin principal is required.
#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct InitArgs {
    pub admin: Principal,
    pub per_transaction_cap: Option<Nat>,
    pub bank_cap: Option<Nat>,
}

/// Granted roles. Root is the deploying identity, Admin the configured
/// operator; both satisfy admin checks.
#[derive(CandidType, Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Root,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Root => "root",
            Role::Admin => "admin",
        }
    }
}

/// Per-request context resolved once at the entry point so the pipeline
/// never reaches for the system API itself.
#[derive(Clone, Copy, Debug)]
pub struct OpContext {
    pub caller: Principal,
    pub self_id: Principal,
    pub now_ns: u64,
}

impl OpContext {
    /// Build the context for the currently executing canister message.
    pub fn current() -> Self {
        Self {
            caller: ic_cdk::caller(),
            self_id: ic_cdk::id(),
            now_ns: ic_cdk::api::time(),
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionDirection {
    Deposit,
    Withdrawal,
}

/// One executed conversion, kept for observability and audit.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct ConversionRecord {
    pub timestamp: u64,
    pub account: Principal,
    pub direction: ConversionDirection,
    pub pay_token: Principal,
    pub receive_token: Principal,
    pub pay_amount: Nat,
    pub receive_amount: Nat,
}

/// Snapshot of the vault for monitoring.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct VaultStatus {
    pub aggregate_balance: Nat,
    pub aggregate_display: String,
    pub bank_cap: Nat,
    pub per_transaction_cap: Nat,
    pub deposits_completed: u64,
    pub withdrawals_completed: u64,
    pub paused: bool,
    pub venue: Option<Principal>,
    pub conversion_records: u64,
}
