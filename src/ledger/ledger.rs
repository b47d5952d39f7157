use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::errors::Result;

use super::{
    activity::{Activity, ActivityId, ActivityType},
    common::{sum_amounts, IdSequence, Identifiable},
    factors::{price, FactorTable},
};

/// Most-recent-first list of logged activities plus the factor table used to price them.
#[derive(Debug, Clone)]
pub struct EmissionLedger {
    factors: FactorTable,
    activities: Vec<Activity>,
    ids: IdSequence,
}

impl EmissionLedger {
    pub fn new(factors: FactorTable) -> Self {
        Self::with_activities(factors, Vec::new())
    }

    /// Rebuilds a ledger from stored activities. Stored emissions are kept as-is.
    pub fn with_activities(factors: FactorTable, activities: Vec<Activity>) -> Self {
        let ids = IdSequence::after(activities.iter().map(Identifiable::raw_id));
        Self {
            factors,
            activities,
            ids,
        }
    }

    pub fn factors(&self) -> &FactorTable {
        &self.factors
    }

    pub fn calculate_emission(&self, detail: &str, amount: f64) -> Result<f64> {
        self.factors.calculate_emission(detail, amount)
    }

    /// Validates, prices, and prepends a new activity.
    pub fn add_activity(
        &mut self,
        activity_type: ActivityType,
        detail: &str,
        amount: f64,
        date: NaiveDate,
    ) -> Result<&Activity> {
        let factor = self.factors.factor_for(activity_type, detail)?;
        let emission = price(factor, detail, amount)?;
        let activity = Activity {
            id: ActivityId(self.ids.allocate()),
            activity_type,
            detail: detail.trim().to_ascii_lowercase(),
            amount,
            date,
            emission,
        };
        tracing::debug!(
            id = %activity.id,
            kind = %activity_type,
            detail = %activity.detail,
            emission,
            "activity recorded"
        );
        self.activities.insert(0, activity);
        Ok(&self.activities[0])
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn activities_of(&self, activity_type: ActivityType) -> impl Iterator<Item = &Activity> {
        self.activities
            .iter()
            .filter(move |activity| activity.activity_type == activity_type)
    }

    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Sum of stored emissions, in kg CO2.
    pub fn total_footprint(&self) -> f64 {
        self.activities.iter().map(|activity| activity.emission).sum()
    }

    /// Sum of physical amounts (km, kWh, kg, units) for one type. Not an emission total.
    pub fn total_by_type(&self, activity_type: ActivityType) -> f64 {
        sum_amounts(self.activities_of(activity_type))
    }

    pub fn emissions_by_type(&self) -> BTreeMap<ActivityType, f64> {
        let mut totals = BTreeMap::new();
        for activity in &self.activities {
            *totals.entry(activity.activity_type).or_insert(0.0) += activity.emission;
        }
        totals
    }

    /// Emission per calendar day, oldest first.
    pub fn daily_emissions(&self) -> BTreeMap<NaiveDate, f64> {
        let mut totals = BTreeMap::new();
        for activity in &self.activities {
            *totals.entry(activity.date).or_insert(0.0) += activity.emission;
        }
        totals
    }

    pub(crate) fn replace_activities(&mut self, activities: Vec<Activity>) {
        self.ids = IdSequence::after(activities.iter().map(Identifiable::raw_id));
        self.activities = activities;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EcoError;
    use crate::ledger::factors::EmissionFactor;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn add_activity_prices_and_prepends() {
        let mut ledger = EmissionLedger::new(FactorTable::builtin());
        ledger
            .add_activity(ActivityType::Transport, "car", 15.0, date(2025, 1, 1))
            .unwrap();
        let second = ledger
            .add_activity(ActivityType::Energy, "electricity", 8.0, date(2025, 1, 2))
            .unwrap()
            .id;
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.activities()[0].id, second);
        assert!(approx(ledger.activities()[1].emission, 3.6));
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ledger = EmissionLedger::new(FactorTable::builtin());
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(
                ledger
                    .add_activity(ActivityType::Food, "fish", 1.0, date(2025, 2, 1))
                    .unwrap()
                    .id,
            );
        }
        let mut sorted = ids.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn rejected_input_leaves_ledger_untouched() {
        let mut ledger = EmissionLedger::new(FactorTable::builtin());
        let missing = ledger
            .add_activity(ActivityType::Food, "tofu", 1.0, date(2025, 1, 1))
            .unwrap_err();
        assert!(matches!(missing, EcoError::MissingFactor(_)));
        let nan = ledger
            .add_activity(ActivityType::Food, "beef", f64::NAN, date(2025, 1, 1))
            .unwrap_err();
        assert!(nan.is_validation());
        let mismatch = ledger
            .add_activity(ActivityType::Energy, "car", 3.0, date(2025, 1, 1))
            .unwrap_err();
        assert!(mismatch.is_validation());
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_footprint(), 0.0);
    }

    #[test]
    fn overflowing_emission_is_not_recorded() {
        let mut ledger = EmissionLedger::new(FactorTable::builtin());
        ledger
            .add_activity(ActivityType::Transport, "car", 15.0, date(2025, 1, 1))
            .unwrap();
        let err = ledger
            .add_activity(ActivityType::Shopping, "electronics", 1e308, date(2025, 1, 1))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(ledger.len(), 1);
        assert!(ledger.total_footprint().is_finite());
    }

    #[test]
    fn stored_emission_survives_factor_changes() {
        let mut ledger = EmissionLedger::new(FactorTable::builtin());
        ledger
            .add_activity(ActivityType::Transport, "car", 10.0, date(2025, 1, 1))
            .unwrap();
        let cheaper = FactorTable::from_entries([(
            "car",
            EmissionFactor::new(ActivityType::Transport, 0.1),
        )])
        .unwrap();
        let reloaded = EmissionLedger::with_activities(cheaper, ledger.activities().to_vec());
        assert!(approx(reloaded.total_footprint(), 2.4));
    }

    #[test]
    fn totals_by_type_sum_amounts_only() {
        let mut ledger = EmissionLedger::new(FactorTable::builtin());
        ledger
            .add_activity(ActivityType::Energy, "electricity", 8.0, date(2025, 1, 1))
            .unwrap();
        ledger
            .add_activity(ActivityType::Energy, "natural_gas", 2.5, date(2025, 1, 2))
            .unwrap();
        ledger
            .add_activity(ActivityType::Transport, "bus", 12.0, date(2025, 1, 2))
            .unwrap();
        assert!(approx(ledger.total_by_type(ActivityType::Energy), 10.5));
        assert!(approx(ledger.total_by_type(ActivityType::Transport), 12.0));
        assert_eq!(ledger.total_by_type(ActivityType::Shopping), 0.0);
    }

    #[test]
    fn breakdowns_group_emissions() {
        let mut ledger = EmissionLedger::new(FactorTable::builtin());
        ledger
            .add_activity(ActivityType::Food, "beef", 0.5, date(2025, 1, 1))
            .unwrap();
        ledger
            .add_activity(ActivityType::Food, "cheese", 1.0, date(2025, 1, 2))
            .unwrap();
        ledger
            .add_activity(ActivityType::Transport, "car", 15.0, date(2025, 1, 2))
            .unwrap();

        let by_type = ledger.emissions_by_type();
        assert!(approx(by_type[&ActivityType::Food], 29.0));
        assert!(approx(by_type[&ActivityType::Transport], 3.6));
        assert!(!by_type.contains_key(&ActivityType::Energy));

        let daily: Vec<_> = ledger.daily_emissions().into_iter().collect();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].0, date(2025, 1, 1));
        assert!(approx(daily[1].1, 17.1));
    }
}
