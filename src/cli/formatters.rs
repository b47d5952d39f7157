use chrono::{Duration, NaiveDate};

use crate::ledger::{Activity, ActivityType, Goal};

/// Formats quantities for presentation.
pub trait AmountFormatter {
    fn format_emission(&self, kg: f64) -> String;
    fn format_amount(&self, amount: f64, activity_type: ActivityType) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Shell formatters: two-decimal quantities and dates relative to `today`.
#[derive(Debug, Clone, Copy)]
pub struct CliFormatters {
    today: NaiveDate,
}

impl CliFormatters {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn activity_row(&self, activity: &Activity) -> Vec<String> {
        vec![
            activity.id.to_string(),
            self.format_date(activity.date),
            activity.activity_type.to_string(),
            activity.detail.clone(),
            self.format_amount(activity.amount, activity.activity_type),
            self.format_emission(activity.emission),
        ]
    }

    pub fn goal_row(&self, goal: &Goal) -> Vec<String> {
        vec![
            goal.id.to_string(),
            goal.description.clone(),
            format!("{:.2} / {:.2}", goal.current, goal.target),
            format!("{:.0}%", goal.progress_ratio() * 100.0),
            self.format_date(goal.deadline),
            goal.status.to_string(),
        ]
    }
}

impl AmountFormatter for CliFormatters {
    fn format_emission(&self, kg: f64) -> String {
        format!("{kg:.2} kg CO2")
    }

    fn format_amount(&self, amount: f64, activity_type: ActivityType) -> String {
        format!("{amount:.2} {}", activity_type.unit())
    }
}

impl DateFormatter for CliFormatters {
    fn format_date(&self, date: NaiveDate) -> String {
        if date == self.today {
            "Today".into()
        } else if date == self.today - Duration::days(1) {
            "Yesterday".into()
        } else {
            date.format("%b %d, %Y").to_string()
        }
    }
}
