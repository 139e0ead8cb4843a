//! Reentrancy guard for state-mutating entry points
//!
//! A request that awaits the external venue yields control, and the venue
//! can call back into this canister before the original request resumes.
//! Without a guard, a withdrawal's outbound swap could reenter and spend
//! a balance the first call has not finished settling.
//!
//! One process-wide lock: every state-mutating entry point acquires it on
//! entry; a reentrant call to any guarded entry point while it is held
//! fails immediately. Release happens on every exit path via `Drop`.

use std::cell::Cell;

use crate::infrastructure::errors::{Result, SystemError, VaultError};

thread_local! {
    static ENTRY_ACTIVE: Cell<bool> = Cell::new(false);
}

/// Exclusive-execution guard for one logical request.
pub struct EntryGuard {
    operation: &'static str,
}

impl EntryGuard {
    /// Acquire the process-wide lock, failing if any guarded request is
    /// already in flight.
    pub fn acquire(operation: &'static str) -> Result<Self> {
        let acquired = ENTRY_ACTIVE.with(|active| {
            if active.get() {
                false
            } else {
                active.set(true);
                true
            }
        });

        if acquired {
            Ok(EntryGuard { operation })
        } else {
            Err(VaultError::System(SystemError::OperationInProgress {
                operation: operation.to_string(),
            }))
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        ENTRY_ACTIVE.with(|active| active.set(false));
    }
}

/// Whether a guarded request is currently in flight (monitoring only).
pub fn is_entry_active() -> bool {
    ENTRY_ACTIVE.with(|active| active.get())
}
