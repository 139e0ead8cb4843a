//! Shared candid wire types

pub mod common;
pub mod icrc;
pub mod venue;

pub use common::{ConversionDirection, ConversionRecord, InitArgs, OpContext, Role, VaultStatus};
