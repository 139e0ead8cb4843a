//! Venue Routing - External swap venue reference
//! Trade-path resolution and quoting against the venue canister

pub mod routing;
pub mod venue;

pub use routing::{quote_out, quote_to_reference, resolve_path};
pub use venue::{SwapVenue, Venue};
