//! Conversion history
//!
//! Bounded audit trail of executed conversions. Informational only -
//! no invariant reads from it - but persisted across upgrades.

use std::cell::RefCell;

use crate::infrastructure::constants::MAX_CONVERSION_HISTORY;
use crate::types::ConversionRecord;

thread_local! {
    static HISTORY: RefCell<Vec<ConversionRecord>> = RefCell::new(Vec::new());
}

pub fn record_conversion(record: ConversionRecord) {
    HISTORY.with(|history| {
        let mut history = history.borrow_mut();
        history.push(record);

        let len = history.len();
        if len > MAX_CONVERSION_HISTORY {
            history.drain(0..(len - MAX_CONVERSION_HISTORY));
        }
    });
}

pub fn get_full_history() -> Vec<ConversionRecord> {
    HISTORY.with(|history| history.borrow().clone())
}

pub fn record_count() -> u64 {
    HISTORY.with(|history| history.borrow().len() as u64)
}

pub fn export_for_stable() -> Vec<ConversionRecord> {
    get_full_history()
}

pub fn load_from_stable(records: Vec<ConversionRecord>) {
    HISTORY.with(|history| *history.borrow_mut() = records);
}
