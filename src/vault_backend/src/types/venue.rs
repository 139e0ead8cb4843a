//! Swap venue wire types
//!
//! The venue is an external canister treated as a black box: it quotes a
//! trade path and executes exact-input swaps against it. Failures come
//! back as `Result<_, String>` in the venue's own reply, separate from
//! transport failures of the call itself.

use candid::{CandidType, Deserialize, Nat, Principal};

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct SwapExactInArgs {
    pub pay_amount: Nat,
    /// Worst acceptable output; the venue rejects the trade below it.
    pub minimum_receive: Nat,
    /// Ordered token identities, first = pay token, last = receive token.
    pub path: Vec<Principal>,
    pub receive_address: Principal,
    /// Advisory execution deadline, nanoseconds since epoch.
    pub deadline_ns: u64,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct SwapExactInReply {
    /// Amount moved at each hop; last element is what the recipient got.
    pub amounts: Vec<Nat>,
}

pub type SwapExactInResult = std::result::Result<SwapExactInReply, String>;

pub type AmountsOutResult = std::result::Result<Vec<Nat>, String>;
