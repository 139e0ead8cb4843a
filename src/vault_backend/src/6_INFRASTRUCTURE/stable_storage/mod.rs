//! Stable storage management for upgrade persistence

use candid::{CandidType, Deserialize, Nat, Principal};

use crate::infrastructure::config::{self, Config};
use crate::infrastructure::admin;
use crate::types::{ConversionRecord, Role};

#[derive(CandidType, Deserialize)]
pub struct StableState {
    pub balances: Vec<(Principal, Nat)>,
    pub aggregate_balance: Nat,
    pub deposits_completed: u64,
    pub withdrawals_completed: u64,
    pub config: Option<Config>,
    pub venue: Option<Principal>,
    pub roles: Vec<(Principal, Vec<Role>)>,
    pub paused: bool,
    pub history: Vec<ConversionRecord>,
}

fn capture() -> StableState {
    let snapshot = crate::_2_CRITICAL_DATA::ledger::export_state();
    StableState {
        balances: snapshot.balances,
        aggregate_balance: snapshot.aggregate_balance,
        deposits_completed: snapshot.deposits_completed,
        withdrawals_completed: snapshot.withdrawals_completed,
        config: Some(config::get()),
        venue: config::venue_override(),
        roles: admin::export_roles(),
        paused: admin::is_paused(),
        history: crate::_5_INFORMATIONAL::history::export_for_stable(),
    }
}

pub fn save_state() {
    let state = capture();
    ic_cdk::println!(
        "💾 Saving {} balances and {} conversion records to stable storage",
        state.balances.len(),
        state.history.len()
    );

    // A failed save must not trap the upgrade; custody balances would be
    // unrecoverable if the canister bricked here.
    match ic_cdk::storage::stable_save((state,)) {
        Ok(_) => {
            ic_cdk::println!("✅ Successfully saved state to stable memory");
        }
        Err(e) => {
            ic_cdk::println!("⚠️ WARNING: Failed to save state to stable memory: {}", e);
        }
    }
}

pub fn restore_state() {
    match ic_cdk::storage::stable_restore::<(StableState,)>() {
        Ok((state,)) => {
            ic_cdk::println!(
                "✅ Restored {} balances and {} conversion records from stable storage",
                state.balances.len(),
                state.history.len()
            );

            crate::_2_CRITICAL_DATA::ledger::import_state(
                state.balances,
                state.aggregate_balance,
                state.deposits_completed,
                state.withdrawals_completed,
            );
            if let Some(cfg) = state.config {
                config::install(cfg);
            }
            config::restore_venue(state.venue);
            admin::import_roles(state.roles);
            admin::set_pause(state.paused);
            crate::_5_INFORMATIONAL::history::load_from_stable(state.history);
        }
        Err(e) => {
            ic_cdk::println!(
                "⚠️  No stable state to restore (first deployment or empty): {}",
                e
            );
        }
    }
}
