//! Reduction goals and their lifecycle status.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{calendar_date, Displayable, Identifiable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub u64);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    ReduceEmissions,
    EnergySaving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    #[default]
    InProgress,
    Completed,
    Failed,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalStatus::InProgress => "in-progress",
            GoalStatus::Completed => "completed",
            GoalStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// A user-defined target for reducing emissions or resource use by a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<GoalKind>,
    pub target: f64,
    #[serde(default)]
    pub current: f64,
    #[serde(with = "calendar_date")]
    pub deadline: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub status: GoalStatus,
}

impl Goal {
    /// Share of the target reached so far, clamped to `0.0..=1.0`.
    pub fn progress_ratio(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        (self.current / self.target).clamp(0.0, 1.0)
    }

    pub fn is_reached(&self) -> bool {
        self.current >= self.target
    }

    pub fn is_open(&self) -> bool {
        self.status == GoalStatus::InProgress
    }
}

impl Identifiable for Goal {
    fn raw_id(&self) -> u64 {
        self.id.0
    }
}

impl Displayable for Goal {
    fn display_label(&self) -> String {
        format!("goal:{} [{}]", self.id, self.status)
    }
}
