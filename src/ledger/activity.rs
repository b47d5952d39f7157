//! Logged activities and their categories.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::EcoError;

use super::common::{calendar_date, Amounted, Displayable, Identifiable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub u64);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Enumerates the activity categories a user can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Transport,
    Energy,
    Food,
    Shopping,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Transport,
        ActivityType::Energy,
        ActivityType::Food,
        ActivityType::Shopping,
    ];

    /// Display unit for amounts of this type.
    pub fn unit(self) -> &'static str {
        match self {
            ActivityType::Transport => "km",
            ActivityType::Energy => "kWh",
            ActivityType::Food => "kg",
            ActivityType::Shopping => "units",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Transport => "transport",
            ActivityType::Energy => "energy",
            ActivityType::Food => "food",
            ActivityType::Shopping => "shopping",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = EcoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "transport" => Ok(ActivityType::Transport),
            "energy" => Ok(ActivityType::Energy),
            "food" => Ok(ActivityType::Food),
            "shopping" => Ok(ActivityType::Shopping),
            other => Err(EcoError::InvalidInput(format!(
                "unknown activity type `{other}` (expected transport, energy, food or shopping)"
            ))),
        }
    }
}

/// A single logged action with its quantity and the emission computed when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub detail: String,
    pub amount: f64,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub emission: f64,
}

impl Activity {
    pub fn unit(&self) -> &'static str {
        self.activity_type.unit()
    }
}

impl Identifiable for Activity {
    fn raw_id(&self) -> u64 {
        self.id.0
    }
}

impl Amounted for Activity {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Activity {
    fn display_label(&self) -> String {
        format!("{} - {}", self.activity_type, self.detail)
    }
}
