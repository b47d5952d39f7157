#![doc(test(attr(deny(warnings))))]

//! Eco Core records everyday activities, converts them into kilograms of CO2
//! through an emission-factor table, tracks reduction goals, and keeps both
//! lists in a durable key-value store.
//!
//! ```
//! use eco_core::ledger::{ActivityType, EmissionLedger, FactorTable};
//! use chrono::NaiveDate;
//!
//! let mut ledger = EmissionLedger::new(FactorTable::builtin());
//! let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
//! ledger.add_activity(ActivityType::Transport, "car", 15.0, date).unwrap();
//! assert!((ledger.total_footprint() - 3.6).abs() < 1e-9);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{FootprintManager, Recorded};
pub use errors::{EcoError, Result, StorageError};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Eco Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
