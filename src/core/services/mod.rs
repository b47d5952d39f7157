pub mod summary_service;

pub use summary_service::{FootprintSummary, GoalOverview, SummaryService};
