//! Informational - Estimates, status and audit history
//! Read-only surfaces; nothing here mutates custody state

pub mod display;
pub mod history;
