//! # Swap Venue Interface
//!
//! Narrow seam between the conversion pipeline and the external venue
//! canister. The pipeline only ever needs three things from a venue:
//! whether a pair exists, what a path would pay out, and an exact-input
//! swap bounded by a minimum output. Tests inject a double here to
//! simulate slippage, rejections and reentrant callbacks.

use async_trait::async_trait;
use candid::{Nat, Principal};

use crate::infrastructure::config;
use crate::infrastructure::errors::{Result, TradingError, VaultError};
use crate::types::venue::{AmountsOutResult, SwapExactInArgs, SwapExactInResult};

#[async_trait(?Send)]
pub trait Venue {
    /// Identity the venue spends approved tokens from.
    fn id(&self) -> Principal;

    /// Pool identity for a direct pair, if the venue trades it.
    async fn resolve_pair(
        &self,
        token_a: Principal,
        token_b: Principal,
    ) -> Result<Option<String>>;

    /// Expected amounts along `path` for `amount_in`; last element is the
    /// estimated output. No state change, no slippage deduction.
    async fn get_amounts_out(&self, amount_in: &Nat, path: &[Principal]) -> Result<Vec<Nat>>;

    /// Execute the trade. The venue rejects it below `minimum_receive`;
    /// on success the last element is what `receive_address` received.
    async fn swap_exact_in(&self, args: SwapExactInArgs) -> Result<Vec<Nat>>;
}

/// Production venue talking to the configured venue canister.
pub struct SwapVenue {
    canister_id: Principal,
}

impl SwapVenue {
    pub fn from_config() -> Result<Self> {
        Ok(Self {
            canister_id: config::venue_canister()?,
        })
    }
}

#[async_trait(?Send)]
impl Venue for SwapVenue {
    fn id(&self) -> Principal {
        self.canister_id
    }

    async fn resolve_pair(
        &self,
        token_a: Principal,
        token_b: Principal,
    ) -> Result<Option<String>> {
        let (pair,): (Option<String>,) =
            ic_cdk::call(self.canister_id, "resolve_pair", (token_a, token_b))
                .await
                .map_err(|(code, msg)| {
                    VaultError::Trading(TradingError::VenueError {
                        operation: "resolve_pair".to_string(),
                        message: format!("Call failed: {} - {}", code as u32, msg),
                    })
                })?;

        Ok(pair)
    }

    async fn get_amounts_out(&self, amount_in: &Nat, path: &[Principal]) -> Result<Vec<Nat>> {
        let (result,): (AmountsOutResult,) = ic_cdk::call(
            self.canister_id,
            "get_amounts_out",
            (amount_in.clone(), path.to_vec()),
        )
        .await
        .map_err(|(code, msg)| {
            VaultError::Trading(TradingError::VenueError {
                operation: "get_amounts_out".to_string(),
                message: format!("Call failed: {} - {}", code as u32, msg),
            })
        })?;

        result.map_err(|e| {
            VaultError::Trading(TradingError::VenueError {
                operation: "get_amounts_out".to_string(),
                message: e,
            })
        })
    }

    async fn swap_exact_in(&self, args: SwapExactInArgs) -> Result<Vec<Nat>> {
        let pay_token = args.path.first().copied().unwrap_or(self.canister_id);
        let receive_token = args.path.last().copied().unwrap_or(self.canister_id);
        let pay_amount = args.pay_amount.clone();

        ic_cdk::println!("📤 Calling venue swap_exact_in()...");

        let (result,): (SwapExactInResult,) =
            ic_cdk::call(self.canister_id, "swap_exact_in", (args,))
                .await
                .map_err(|(code, msg)| {
                    ic_cdk::println!("❌ Swap call failed: {:?} - {}", code, msg);
                    VaultError::Trading(TradingError::SwapFailed {
                        pay_token: pay_token.to_text(),
                        receive_token: receive_token.to_text(),
                        amount: pay_amount.to_string(),
                        reason: format!("Inter-canister call failed: {} - {}", code as u32, msg),
                    })
                })?;

        let reply = result.map_err(|e| {
            ic_cdk::println!("❌ Swap rejected by venue: {}", e);
            VaultError::Trading(TradingError::SwapFailed {
                pay_token: pay_token.to_text(),
                receive_token: receive_token.to_text(),
                amount: pay_amount.to_string(),
                reason: e,
            })
        })?;

        Ok(reply.amounts)
    }
}
