//! # Token Movement
//!
//! ICRC-1/ICRC-2 moves behind a narrow trait: deposits are pulled in
//! with `transfer_from` (caller approves the vault first), withdrawal
//! payouts go out with `transfer`, and the venue is authorised to spend
//! a swap's input with `approve`. Each approval covers exactly one swap
//! and expires on its own.

use async_trait::async_trait;
use candid::{Nat, Principal};
use serde_bytes::ByteBuf;

use crate::infrastructure::errors::{Result, TransferError as VaultTransferError, VaultError};
use crate::types::icrc::{
    Account, ApproveArgs, ApproveResult, TransferArgs, TransferFromArgs, TransferFromResult,
    TransferResult,
};

/// Approval validity handed to the venue (15 minutes)
const APPROVAL_EXPIRY_NANOS: u64 = 900_000_000_000;

#[async_trait(?Send)]
pub trait Transfers {
    /// Push `amount` of `token` from the vault to `to`.
    async fn transfer(&self, token: Principal, to: Principal, amount: Nat) -> Result<Nat>;

    /// Pull `amount` of `token` from `from` into `to` using the owner's
    /// prior approval.
    async fn transfer_from(
        &self,
        token: Principal,
        from: Principal,
        to: Principal,
        amount: Nat,
    ) -> Result<Nat>;

    /// Authorise `spender` to move `amount` of the vault's `token`.
    async fn approve(&self, token: Principal, spender: Principal, amount: Nat) -> Result<Nat>;

    /// Balance `account` holds on the `token` ledger.
    async fn balance_of(&self, token: Principal, account: Principal) -> Result<Nat>;
}

/// Production transfers against real ICRC ledgers.
pub struct IcrcTransfers;

#[async_trait(?Send)]
impl Transfers for IcrcTransfers {
    async fn transfer(&self, token: Principal, to: Principal, amount: Nat) -> Result<Nat> {
        let args = TransferArgs {
            from_subaccount: None,
            to: Account::of(to),
            amount: amount.clone(),
            fee: None,
            memo: Some(ByteBuf::from(*b"vault payout")),
            created_at_time: Some(ic_cdk::api::time()),
        };

        let (result,): (TransferResult,) = ic_cdk::call(token, "icrc1_transfer", (args,))
            .await
            .map_err(|(code, msg)| {
                VaultError::Transfer(VaultTransferError::TransferFailed {
                    token: token.to_text(),
                    amount: amount.to_string(),
                    reason: format!("Call failed: {} - {}", code as u32, msg),
                })
            })?;

        result.map_err(|e| {
            VaultError::Transfer(VaultTransferError::TransferFailed {
                token: token.to_text(),
                amount: amount.to_string(),
                reason: format!("{:?}", e),
            })
        })
    }

    async fn transfer_from(
        &self,
        token: Principal,
        from: Principal,
        to: Principal,
        amount: Nat,
    ) -> Result<Nat> {
        let args = TransferFromArgs {
            spender_subaccount: None,
            from: Account::of(from),
            to: Account::of(to),
            amount: amount.clone(),
            fee: None,
            memo: Some(ByteBuf::from(*b"vault deposit")),
            created_at_time: Some(ic_cdk::api::time()),
        };

        let (result,): (TransferFromResult,) =
            ic_cdk::call(token, "icrc2_transfer_from", (args,))
                .await
                .map_err(|(code, msg)| {
                    VaultError::Transfer(VaultTransferError::TransferFailed {
                        token: token.to_text(),
                        amount: amount.to_string(),
                        reason: format!("Call failed: {} - {}", code as u32, msg),
                    })
                })?;

        result.map_err(|e| {
            VaultError::Transfer(VaultTransferError::TransferFailed {
                token: token.to_text(),
                amount: amount.to_string(),
                reason: format!("{:?}", e),
            })
        })
    }

    async fn approve(&self, token: Principal, spender: Principal, amount: Nat) -> Result<Nat> {
        ic_cdk::println!(
            "📝 Approving {} of {} for venue {}",
            amount,
            token.to_text(),
            spender.to_text()
        );

        let args = ApproveArgs {
            from_subaccount: None,
            spender: Account::of(spender),
            amount: amount.clone(),
            expected_allowance: None,
            expires_at: Some(ic_cdk::api::time() + APPROVAL_EXPIRY_NANOS),
            fee: None,
            memo: Some(ByteBuf::from(*b"vault swap")),
            created_at_time: Some(ic_cdk::api::time()),
        };

        let (result,): (ApproveResult,) = ic_cdk::call(token, "icrc2_approve", (args,))
            .await
            .map_err(|(code, msg)| {
                VaultError::Transfer(VaultTransferError::ApprovalFailed {
                    token: token.to_text(),
                    amount: amount.to_string(),
                    reason: format!("Call failed: {} - {}", code as u32, msg),
                })
            })?;

        result.map_err(|e| {
            VaultError::Transfer(VaultTransferError::ApprovalFailed {
                token: token.to_text(),
                amount: amount.to_string(),
                reason: format!("{:?}", e),
            })
        })
    }

    async fn balance_of(&self, token: Principal, account: Principal) -> Result<Nat> {
        let (balance,): (Nat,) = ic_cdk::call(token, "icrc1_balance_of", (Account::of(account),))
            .await
            .map_err(|(code, msg)| {
                VaultError::Transfer(VaultTransferError::TransferFailed {
                    token: token.to_text(),
                    amount: "0".to_string(),
                    reason: format!("Balance query failed: {} - {}", code as u32, msg),
                })
            })?;

        Ok(balance)
    }
}
