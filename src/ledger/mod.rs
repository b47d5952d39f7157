//! Ledger domain: activities, emission factors, goals, and the two in-memory lists.

pub mod activity;
pub mod common;
pub mod factors;
pub mod goal;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod samples;
pub mod tracker;

pub use activity::{Activity, ActivityId, ActivityType};
pub use common::{Amounted, Displayable, IdSequence, Identifiable};
pub use factors::{EmissionFactor, FactorTable};
pub use goal::{Goal, GoalId, GoalKind, GoalStatus};
pub use ledger::EmissionLedger;
pub use tracker::GoalTracker;
