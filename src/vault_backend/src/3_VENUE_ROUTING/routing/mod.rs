//! # Trade Path Resolution
//!
//! Decides how an input token reaches an output token on the venue:
//! identity when they are the same token, the direct pair when the venue
//! trades it, otherwise two hops through the bridging token. Shared by
//! pre-trade validation, execution and the read-only estimates, so all
//! three see the same route.

use candid::{Nat, Principal};

use super::venue::Venue;
use crate::infrastructure::constants;
use crate::infrastructure::errors::{Result, TradingError, VaultError};

/// Resolve the token path from `from` to `to`.
///
/// Returns a single-element path for an identity conversion, two
/// elements for a direct pair, three for a bridged route. Fails with
/// `PairNotFound` when neither a direct nor a bridged route exists.
pub async fn resolve_path<V: Venue>(
    venue: &V,
    from: Principal,
    to: Principal,
) -> Result<Vec<Principal>> {
    if from == to {
        return Ok(vec![from]);
    }

    if venue.resolve_pair(from, to).await?.is_some() {
        return Ok(vec![from, to]);
    }

    let bridge = constants::bridge_token()?;
    if from != bridge && to != bridge {
        let first_leg = venue.resolve_pair(from, bridge).await?;
        let second_leg = venue.resolve_pair(bridge, to).await?;
        if first_leg.is_some() && second_leg.is_some() {
            return Ok(vec![from, bridge, to]);
        }
    }

    Err(VaultError::Trading(TradingError::PairNotFound {
        pay_token: from.to_text(),
        receive_token: to.to_text(),
    }))
}

/// Expected output of converting `amount` from `from` to `to`, with no
/// slippage deduction. Identity conversions pass the amount through.
pub async fn quote_out<V: Venue>(
    venue: &V,
    amount: &Nat,
    from: Principal,
    to: Principal,
) -> Result<Nat> {
    if from == to {
        return Ok(amount.clone());
    }

    let path = resolve_path(venue, from, to).await?;
    let amounts = venue.get_amounts_out(amount, &path).await?;

    amounts.last().cloned().ok_or_else(|| {
        VaultError::Trading(TradingError::VenueError {
            operation: "get_amounts_out".to_string(),
            message: "venue returned an empty amounts sequence".to_string(),
        })
    })
}

/// Estimated reference-token value of `amount` of `asset`.
pub async fn quote_to_reference<V: Venue>(
    venue: &V,
    asset: Principal,
    amount: &Nat,
) -> Result<Nat> {
    let reference = constants::reference_token()?;
    quote_out(venue, amount, asset, reference).await
}
