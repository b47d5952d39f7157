use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::ledger::{ActivityType, EmissionLedger, GoalStatus, GoalTracker};

/// Dashboard totals: emission in kg CO2, plus the energy and transport quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintSummary {
    pub total_emission: f64,
    pub energy_kwh: f64,
    pub transport_km: f64,
    pub activity_count: usize,
    pub by_type: BTreeMap<ActivityType, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalOverview {
    pub in_progress: usize,
    pub completed: usize,
    pub failed: usize,
}

pub struct SummaryService;

impl SummaryService {
    pub fn footprint(ledger: &EmissionLedger) -> FootprintSummary {
        FootprintSummary {
            total_emission: ledger.total_footprint(),
            energy_kwh: ledger.total_by_type(ActivityType::Energy),
            transport_km: ledger.total_by_type(ActivityType::Transport),
            activity_count: ledger.len(),
            by_type: ledger.emissions_by_type(),
        }
    }

    /// Daily emission totals between `from` and `to`, both inclusive.
    pub fn daily_window(
        ledger: &EmissionLedger,
        from: NaiveDate,
        to: NaiveDate,
    ) -> BTreeMap<NaiveDate, f64> {
        ledger
            .daily_emissions()
            .into_iter()
            .filter(|(date, _)| *date >= from && *date <= to)
            .collect()
    }

    pub fn goals(tracker: &GoalTracker) -> GoalOverview {
        tracker
            .goals()
            .iter()
            .fold(GoalOverview::default(), |mut overview, goal| {
                match goal.status {
                    GoalStatus::InProgress => overview.in_progress += 1,
                    GoalStatus::Completed => overview.completed += 1,
                    GoalStatus::Failed => overview.failed += 1,
                }
                overview
            })
    }
}
