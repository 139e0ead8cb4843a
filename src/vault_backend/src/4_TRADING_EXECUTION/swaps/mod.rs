//! # Swap Execution Module
//!
//! Executes slippage-bounded exact-input swaps on the venue.
//!
//! ## Swap Flow
//! 1. Validate parameters
//! 2. Approve the venue to spend the pay token
//! 3. Quote the expected output for the path
//! 4. Derive the minimum acceptable output (98/100 of the quote)
//! 5. Execute `swap_exact_in` with that minimum
//! 6. Re-check the actual amount against the minimum
//!
//! The venue may fail the trade when it cannot meet the minimum; that
//! failure aborts the whole surrounding request.

use candid::{Nat, Principal};

use crate::infrastructure::constants::SWAP_DEADLINE_NANOS;
use crate::infrastructure::errors::{Result, TradingError, VaultError};
use crate::types::venue::SwapExactInArgs;
use crate::types::OpContext;
use crate::_3_VENUE_ROUTING::venue::Venue;
use super::slippage;
use super::transfers::Transfers;

/// Swap `amount` of `path[0]` for `path.last()` along `path`, delivering
/// the output to `recipient`. Returns the amount actually delivered.
pub async fn execute_swap_exact_in<V: Venue, T: Transfers>(
    venue: &V,
    tokens: &T,
    amount: &Nat,
    path: &[Principal],
    recipient: Principal,
    ctx: &OpContext,
) -> Result<Nat> {
    validate_swap_params(amount, path)?;

    let pay_token = path[0];
    let receive_token = path[path.len() - 1];

    ic_cdk::println!(
        "🔄 Executing swap: {} {} → {} via {} hop(s)",
        amount,
        pay_token.to_text(),
        receive_token.to_text(),
        path.len() - 1
    );

    // Venue spends the input through an approval scoped to this swap
    tokens.approve(pay_token, venue.id(), amount.clone()).await?;

    let amounts = venue.get_amounts_out(amount, path).await?;
    let expected = amounts.last().cloned().ok_or_else(|| {
        VaultError::Trading(TradingError::VenueError {
            operation: "get_amounts_out".to_string(),
            message: "venue returned an empty amounts sequence".to_string(),
        })
    })?;

    let minimum = slippage::minimum_out(&expected)?;

    ic_cdk::println!(
        "📊 Expected output {} (minimum accepted {})",
        expected,
        minimum
    );

    let executed = venue
        .swap_exact_in(SwapExactInArgs {
            pay_amount: amount.clone(),
            minimum_receive: minimum.clone(),
            path: path.to_vec(),
            receive_address: recipient,
            deadline_ns: ctx.now_ns + SWAP_DEADLINE_NANOS,
        })
        .await?;

    let actual = executed.last().cloned().ok_or_else(|| {
        VaultError::Trading(TradingError::SwapFailed {
            pay_token: pay_token.to_text(),
            receive_token: receive_token.to_text(),
            amount: amount.to_string(),
            reason: "venue reported no output amount".to_string(),
        })
    })?;

    slippage::validate_swap_result(&expected, &actual, &minimum)?;

    ic_cdk::println!(
        "✅ Swap complete: {} {} → {} {}",
        amount,
        pay_token.to_text(),
        actual,
        receive_token.to_text()
    );

    Ok(actual)
}

/// Reject malformed swap requests before touching the venue.
fn validate_swap_params(amount: &Nat, path: &[Principal]) -> Result<()> {
    if amount == &Nat::from(0u64) {
        return Err(VaultError::Trading(TradingError::InvalidSwapParams {
            reason: "Pay amount must be greater than zero".to_string(),
        }));
    }

    if path.len() < 2 {
        return Err(VaultError::Trading(TradingError::InvalidSwapParams {
            reason: format!("Path must contain at least two tokens, got {}", path.len()),
        }));
    }

    if path[0] == path[path.len() - 1] {
        return Err(VaultError::Trading(TradingError::InvalidSwapParams {
            reason: "Pay and receive tokens must be different".to_string(),
        }));
    }

    Ok(())
}
