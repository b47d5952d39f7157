use chrono::NaiveDate;
use eco_core::{
    ledger::{GoalId, GoalKind, GoalStatus, GoalTracker},
    EcoError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn new_goals_append_in_creation_order() {
    let mut tracker = GoalTracker::new();
    let first = tracker
        .add_goal(50.0, "Cut car trips", date(2025, 6, 1))
        .unwrap()
        .clone();
    let second = tracker
        .add_goal_of_kind(
            Some(GoalKind::EnergySaving),
            20.0,
            "  Save 20kWh  ",
            date(2025, 3, 1),
        )
        .unwrap()
        .clone();

    assert_eq!(tracker.len(), 2);
    assert_eq!(tracker.goals()[0].id, first.id);
    assert_eq!(tracker.goals()[1].id, second.id);
    assert_eq!(first.current, 0.0);
    assert_eq!(first.status, GoalStatus::InProgress);
    assert_eq!(second.description, "Save 20kWh");
}

#[test]
fn invalid_goals_are_rejected() {
    let mut tracker = GoalTracker::new();
    for (target, description) in [(0.0, "zero"), (-5.0, "negative"), (f64::INFINITY, "inf"), (5.0, "   ")] {
        let err = tracker
            .add_goal(target, description, date(2025, 1, 1))
            .unwrap_err();
        assert!(err.is_validation(), "{target} / {description:?}");
    }
    assert!(tracker.is_empty());
}

#[test]
fn reaching_the_target_completes_the_goal() {
    let mut tracker = GoalTracker::new();
    let id = tracker
        .add_goal(20.0, "Save energy", date(2025, 3, 1))
        .unwrap()
        .id;

    let goal = tracker.update_progress(id, 8.5).unwrap();
    assert_eq!(goal.status, GoalStatus::InProgress);
    assert!((goal.progress_ratio() - 0.425).abs() < 1e-9);

    let goal = tracker.update_progress(id, 25.0).unwrap();
    assert_eq!(goal.status, GoalStatus::Completed);
    assert_eq!(goal.progress_ratio(), 1.0);
}

#[test]
fn unknown_goal_id_is_reported() {
    let mut tracker = GoalTracker::new();
    let err = tracker.update_progress(GoalId(42), 1.0).unwrap_err();
    assert!(matches!(err, EcoError::GoalNotFound(GoalId(42))));
}

#[test]
fn evaluate_fails_only_overdue_open_goals() {
    let mut tracker = GoalTracker::new();
    let overdue = tracker.add_goal(10.0, "overdue", date(2025, 1, 1)).unwrap().id;
    let due_today = tracker.add_goal(10.0, "due today", date(2025, 2, 1)).unwrap().id;
    let future = tracker.add_goal(10.0, "future", date(2025, 9, 1)).unwrap().id;
    let done = tracker.add_goal(10.0, "done early", date(2025, 1, 1)).unwrap().id;
    tracker.update_progress(done, 10.0).unwrap();

    assert_eq!(tracker.evaluate(date(2025, 2, 1)), 1);
    let status = |id| tracker.goal(id).unwrap().status;
    assert_eq!(status(overdue), GoalStatus::Failed);
    assert_eq!(status(due_today), GoalStatus::InProgress);
    assert_eq!(status(future), GoalStatus::InProgress);
    assert_eq!(status(done), GoalStatus::Completed);

    // Settled goals are not evaluated again.
    assert_eq!(tracker.evaluate(date(2026, 1, 1)), 2);
    assert_eq!(tracker.evaluate(date(2026, 1, 1)), 0);
}
