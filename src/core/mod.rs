//! Application state: the footprint manager, read-side services, clocks, and paths.

pub mod footprint_manager;
pub mod services;
pub mod time;
pub mod utils;

pub use footprint_manager::{FootprintManager, Recorded};
pub use time::{Clock, FixedClock, SystemClock};
