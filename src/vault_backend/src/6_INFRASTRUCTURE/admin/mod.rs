//! Access control
//!
//! Role storage is grant-only in the normal path: `init` bootstraps a
//! Root role for the deploying identity and an Admin role for the
//! configured operator, and admins can add further admins. Either role
//! passes `require_admin`; Root exists so the deployer keeps control if
//! the admin key is lost.
//!
//! Also owns the emergency pause flag and the bounded admin action log.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use candid::Principal;

use crate::infrastructure::constants::MAX_ADMIN_LOG_ENTRIES;
use crate::infrastructure::errors::{
    AuthError, Result, SystemError, ValidationError, VaultError,
};
use crate::types::Role;

thread_local! {
    static ROLES: RefCell<HashMap<Principal, HashSet<Role>>> = RefCell::new(HashMap::new());
    static EMERGENCY_PAUSE: RefCell<bool> = RefCell::new(false);
    static ADMIN_LOG: RefCell<Vec<AdminAction>> = RefCell::new(Vec::new());
}

/// Admin action log entry
#[derive(Clone, candid::CandidType, candid::Deserialize, serde::Serialize, Debug)]
pub struct AdminAction {
    pub timestamp: u64,
    pub admin: Principal,
    pub action: String,
}

/// Grant the two install-time roles. Called once from `init`.
pub fn bootstrap_roles(deployer: Principal, admin: Principal) {
    ROLES.with(|roles| {
        let mut roles = roles.borrow_mut();
        roles.entry(deployer).or_default().insert(Role::Root);
        roles.entry(admin).or_default().insert(Role::Admin);
    });
}

pub fn has_role(account: Principal, role: Role) -> bool {
    ROLES.with(|roles| {
        roles
            .borrow()
            .get(&account)
            .map(|granted| granted.contains(&role))
            .unwrap_or(false)
    })
}

fn is_admin(account: Principal) -> bool {
    has_role(account, Role::Admin) || has_role(account, Role::Root)
}

/// Grant `role` to `target`. The actor must already hold Admin or Root.
pub fn grant_role(actor: Principal, target: Principal, role: Role) -> Result<()> {
    if !is_admin(actor) {
        return Err(VaultError::Auth(AuthError::CallerNotAdmin {
            caller: actor.to_text(),
        }));
    }

    if target == Principal::anonymous() || target == Principal::management_canister() {
        return Err(VaultError::Validation(ValidationError::InvalidAccount {
            account: target.to_text(),
        }));
    }

    ROLES.with(|roles| {
        roles.borrow_mut().entry(target).or_default().insert(role);
    });

    Ok(())
}

/// Require caller holds an admin-capable role
pub fn require_admin(caller: Principal) -> Result<()> {
    if is_admin(caller) {
        Ok(())
    } else {
        Err(VaultError::Auth(AuthError::CallerNotAdmin {
            caller: caller.to_text(),
        }))
    }
}

/// Log an admin action. Only called from the endpoint layer, where the
/// caller identity and time are available.
pub fn log_admin_action(action: String) {
    ADMIN_LOG.with(|log| {
        let mut log = log.borrow_mut();

        log.push(AdminAction {
            timestamp: ic_cdk::api::time(),
            admin: ic_cdk::caller(),
            action: action.clone(),
        });

        let len = log.len();
        if len > MAX_ADMIN_LOG_ENTRIES {
            log.drain(0..(len - MAX_ADMIN_LOG_ENTRIES));
        }
    });

    ic_cdk::println!("📝 Admin action: {} by {}", action, ic_cdk::caller());
}

pub fn get_admin_log() -> Vec<AdminAction> {
    ADMIN_LOG.with(|log| log.borrow().clone())
}

/// Check the system is not emergency paused
pub fn check_not_paused() -> Result<()> {
    EMERGENCY_PAUSE.with(|p| {
        if *p.borrow() {
            Err(VaultError::System(SystemError::Paused))
        } else {
            Ok(())
        }
    })
}

pub fn set_pause(paused: bool) {
    EMERGENCY_PAUSE.with(|p| *p.borrow_mut() = paused);
}

pub fn is_paused() -> bool {
    EMERGENCY_PAUSE.with(|p| *p.borrow())
}

// === STABLE STORAGE EXPORT/IMPORT ===

pub fn export_roles() -> Vec<(Principal, Vec<Role>)> {
    ROLES.with(|roles| {
        roles
            .borrow()
            .iter()
            .map(|(account, granted)| (*account, granted.iter().copied().collect()))
            .collect()
    })
}

pub fn import_roles(entries: Vec<(Principal, Vec<Role>)>) {
    ROLES.with(|roles| {
        let mut roles = roles.borrow_mut();
        roles.clear();
        for (account, granted) in entries {
            roles.insert(account, granted.into_iter().collect());
        }
    });
}
