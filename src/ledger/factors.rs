//! Emission factor table: kg CO2 per unit for every known activity detail.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EcoError, Result};

use super::activity::ActivityType;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub kg_per_unit: f64,
}

impl EmissionFactor {
    pub const fn new(activity_type: ActivityType, kg_per_unit: f64) -> Self {
        Self {
            activity_type,
            kg_per_unit,
        }
    }
}

const BUILTIN: &[(&str, ActivityType, f64)] = &[
    ("car", ActivityType::Transport, 0.24),
    ("bus", ActivityType::Transport, 0.10),
    ("train", ActivityType::Transport, 0.06),
    ("bicycle", ActivityType::Transport, 0.0),
    ("motorcycle", ActivityType::Transport, 0.12),
    ("electricity", ActivityType::Energy, 0.52),
    // per m3 and per litre, logged under the energy unit
    ("natural_gas", ActivityType::Energy, 2.0),
    ("heating_oil", ActivityType::Energy, 2.68),
    ("beef", ActivityType::Food, 31.0),
    ("lamb", ActivityType::Food, 24.0),
    ("chicken", ActivityType::Food, 6.0),
    ("pork", ActivityType::Food, 7.0),
    ("fish", ActivityType::Food, 5.0),
    ("cheese", ActivityType::Food, 13.5),
    ("clothing", ActivityType::Shopping, 15.0),
    ("electronics", ActivityType::Shopping, 50.0),
    ("furniture", ActivityType::Shopping, 30.0),
    ("plastic", ActivityType::Shopping, 6.0),
];

static DEFAULT_TABLE: Lazy<FactorTable> = Lazy::new(|| FactorTable {
    entries: BUILTIN
        .iter()
        .map(|(detail, kind, factor)| ((*detail).to_string(), EmissionFactor::new(*kind, *factor)))
        .collect(),
});

/// Immutable detail -> factor mapping, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorTable {
    entries: BTreeMap<String, EmissionFactor>,
}

impl FactorTable {
    /// Table with no entries; every lookup fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in factor table.
    pub fn builtin() -> Self {
        DEFAULT_TABLE.clone()
    }

    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, EmissionFactor)>,
        S: Into<String>,
    {
        let mut table = Self::empty();
        for (detail, factor) in entries {
            table.insert(detail.into(), factor)?;
        }
        Ok(table)
    }

    /// Returns a copy of this table with `overrides` merged in; overrides replace built-ins.
    pub fn with_overrides<'a, I>(&self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a EmissionFactor)>,
    {
        let mut table = self.clone();
        for (detail, factor) in overrides {
            table.insert(detail.clone(), *factor)?;
        }
        Ok(table)
    }

    fn insert(&mut self, detail: String, factor: EmissionFactor) -> Result<()> {
        let key = normalize_detail(&detail);
        if key.is_empty() {
            return Err(EcoError::Config("emission factor detail is empty".into()));
        }
        if !factor.kg_per_unit.is_finite() || factor.kg_per_unit < 0.0 {
            return Err(EcoError::Config(format!(
                "emission factor for `{key}` must be a non-negative number"
            )));
        }
        self.entries.insert(key, factor);
        Ok(())
    }

    pub fn get(&self, detail: &str) -> Option<&EmissionFactor> {
        self.entries.get(&normalize_detail(detail))
    }

    pub fn contains(&self, detail: &str) -> bool {
        self.get(detail).is_some()
    }

    /// Looks up `detail` and checks that it belongs to `activity_type`.
    pub fn factor_for(&self, activity_type: ActivityType, detail: &str) -> Result<&EmissionFactor> {
        let factor = self
            .get(detail)
            .ok_or_else(|| EcoError::MissingFactor(detail.trim().to_string()))?;
        if factor.activity_type != activity_type {
            return Err(EcoError::InvalidInput(format!(
                "`{}` is a {} detail, not {}",
                detail.trim(),
                factor.activity_type,
                activity_type
            )));
        }
        Ok(factor)
    }

    /// Emission for `amount` units of `detail`, in kg CO2.
    pub fn calculate_emission(&self, detail: &str, amount: f64) -> Result<f64> {
        let factor = self
            .get(detail)
            .ok_or_else(|| EcoError::MissingFactor(detail.trim().to_string()))?;
        price(factor, detail, amount)
    }

    /// Detail keys registered for `activity_type`, in alphabetical order.
    pub fn details_for(&self, activity_type: ActivityType) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, factor)| factor.activity_type == activity_type)
            .map(|(detail, _)| detail.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmissionFactor)> {
        self.entries
            .iter()
            .map(|(detail, factor)| (detail.as_str(), factor))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(EcoError::InvalidInput(format!(
            "amount must be a finite number, got {amount}"
        )));
    }
    if amount < 0.0 {
        return Err(EcoError::InvalidInput(format!(
            "amount must not be negative, got {amount}"
        )));
    }
    Ok(())
}

/// Multiplies `amount` by the factor; an emission that overflows `f64` is rejected.
pub(crate) fn price(factor: &EmissionFactor, detail: &str, amount: f64) -> Result<f64> {
    validate_amount(amount)?;
    let emission = factor.kg_per_unit * amount;
    if !emission.is_finite() {
        return Err(EcoError::InvalidInput(format!(
            "emission for {amount} units of `{}` is out of range",
            detail.trim()
        )));
    }
    Ok(emission)
}

fn normalize_detail(detail: &str) -> String {
    detail.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn builtin_table_covers_every_type() {
        let table = FactorTable::builtin();
        assert_eq!(table.len(), 18);
        for kind in ActivityType::ALL {
            assert!(!table.details_for(kind).is_empty(), "no details for {kind}");
        }
        assert_eq!(
            table.details_for(ActivityType::Energy),
            vec!["electricity", "heating_oil", "natural_gas"]
        );
    }

    #[test]
    fn calculates_factor_times_amount() {
        let table = FactorTable::builtin();
        assert!(approx(table.calculate_emission("car", 15.0).unwrap(), 3.6));
        assert!(approx(table.calculate_emission("Beef", 0.5).unwrap(), 15.5));
        assert!(approx(table.calculate_emission("bicycle", 40.0).unwrap(), 0.0));
    }

    #[test]
    fn unknown_detail_is_a_configuration_error() {
        let table = FactorTable::builtin();
        let err = table.calculate_emission("unknown-detail", 10.0).unwrap_err();
        assert!(matches!(err, EcoError::MissingFactor(ref detail) if detail == "unknown-detail"));
        assert!(err.is_configuration());
    }

    #[test]
    fn non_finite_amount_is_rejected() {
        let table = FactorTable::builtin();
        assert!(table.calculate_emission("car", f64::NAN).unwrap_err().is_validation());
        assert!(table.calculate_emission("car", -1.0).unwrap_err().is_validation());
    }

    #[test]
    fn overflowing_emission_is_rejected() {
        let table = FactorTable::builtin();
        let err = table.calculate_emission("electronics", 1e308).unwrap_err();
        assert!(err.is_validation());
        assert!(approx(table.calculate_emission("bicycle", 1e308).unwrap(), 0.0));
    }

    #[test]
    fn factor_for_checks_type_membership() {
        let table = FactorTable::builtin();
        assert!(table.factor_for(ActivityType::Food, "beef").is_ok());
        let err = table.factor_for(ActivityType::Transport, "beef").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn overrides_replace_and_extend_builtins() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "car".to_string(),
            EmissionFactor::new(ActivityType::Transport, 0.2),
        );
        overrides.insert(
            "ferry".to_string(),
            EmissionFactor::new(ActivityType::Transport, 0.19),
        );
        let table = FactorTable::builtin().with_overrides(&overrides).unwrap();
        assert_eq!(table.len(), 19);
        assert!(approx(table.get("car").unwrap().kg_per_unit, 0.2));
        assert!(table.contains("ferry"));
    }

    #[test]
    fn negative_override_is_rejected() {
        let err = FactorTable::from_entries([(
            "car",
            EmissionFactor::new(ActivityType::Transport, -0.5),
        )])
        .unwrap_err();
        assert!(err.is_configuration());
    }
}
