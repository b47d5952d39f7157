//! Starter data for a fresh store, written only when the configuration asks for it.

use chrono::{Duration, NaiveDate};

use super::{
    activity::{Activity, ActivityId, ActivityType},
    goal::{Goal, GoalId, GoalKind, GoalStatus},
};

/// Three example activities dated `today`, yesterday and two days ago (newest first).
pub fn sample_activities(today: NaiveDate) -> Vec<Activity> {
    vec![
        Activity {
            id: ActivityId(1),
            activity_type: ActivityType::Transport,
            detail: "car".into(),
            amount: 15.0,
            date: today,
            emission: 3.6,
        },
        Activity {
            id: ActivityId(2),
            activity_type: ActivityType::Energy,
            detail: "electricity".into(),
            amount: 8.0,
            date: today - Duration::days(1),
            emission: 4.2,
        },
        Activity {
            id: ActivityId(3),
            activity_type: ActivityType::Food,
            detail: "beef".into(),
            amount: 0.5,
            date: today - Duration::days(2),
            emission: 15.5,
        },
    ]
}

/// Two example goals with partial progress, due 90 and 30 days after `today`.
pub fn sample_goals(today: NaiveDate) -> Vec<Goal> {
    vec![
        Goal {
            id: GoalId(1),
            kind: Some(GoalKind::ReduceEmissions),
            target: 50.0,
            current: 12.3,
            deadline: today + Duration::days(90),
            description: "Reduce monthly carbon emissions by 50kg".into(),
            status: GoalStatus::InProgress,
        },
        Goal {
            id: GoalId(2),
            kind: Some(GoalKind::EnergySaving),
            target: 20.0,
            current: 8.5,
            deadline: today + Duration::days(30),
            description: "Save 20kWh of electricity per month".into(),
            status: GoalStatus::InProgress,
        },
    ]
}
