mod common;

use chrono::NaiveDate;
use eco_core::{
    core::{FixedClock, FootprintManager},
    ledger::{Activity, ActivityType, FactorTable, Goal, GoalStatus},
    storage::{self, KeyValueStore, MemoryStore, ACTIVITIES_KEY, GOALS_KEY},
    StorageError,
};

use common::{file_store, open_manager, temp_home, today};

#[test]
fn lists_round_trip_through_the_file_store() {
    let home = temp_home();
    let (activities, goals) = {
        let mut manager = open_manager(&home);
        let _ = manager
            .add_activity(ActivityType::Transport, "car", 15.0, today())
            .unwrap();
        let _ = manager
            .add_activity(ActivityType::Food, "beef", 0.5, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
            .unwrap();
        let goal = manager
            .add_goal(50.0, "Reduce monthly emissions", NaiveDate::from_ymd_opt(2025, 4, 1).unwrap())
            .unwrap();
        let _ = manager.update_goal_progress(goal.entry.id, 12.5).unwrap();
        (
            manager.ledger().activities().to_vec(),
            manager.goals().goals().to_vec(),
        )
    };

    let reopened = open_manager(&home);
    assert_eq!(reopened.ledger().activities(), activities.as_slice());
    assert_eq!(reopened.goals().goals(), goals.as_slice());

    let raw = file_store(&home).get_item(ACTIVITIES_KEY).unwrap().unwrap();
    assert!(raw.contains("\"type\":\"transport\""));
    assert!(raw.contains("\"date\":\"2024-12-31\""));
}

#[test]
fn legacy_timestamp_dates_load_as_calendar_dates() {
    let store = MemoryStore::new();
    store
        .set_item(
            ACTIVITIES_KEY,
            r#"[{"id":1726912800000,"type":"energy","detail":"electricity","amount":8,"date":"2024-09-21T10:00:00.000Z","emission":4.2}]"#,
        )
        .unwrap();
    store
        .set_item(
            GOALS_KEY,
            r#"[{"id":2,"type":"energy_saving","target":20,"current":8.5,"deadline":"2024-10-21T10:00:00.000Z","description":"Save 20kWh","status":"in-progress"}]"#,
        )
        .unwrap();

    let activities: Vec<Activity> = storage::load(&store, ACTIVITIES_KEY, Vec::new()).unwrap();
    let goals: Vec<Goal> = storage::load(&store, GOALS_KEY, Vec::new()).unwrap();
    assert_eq!(activities[0].date, NaiveDate::from_ymd_opt(2024, 9, 21).unwrap());
    assert_eq!(activities[0].emission, 4.2);
    assert_eq!(goals[0].deadline, NaiveDate::from_ymd_opt(2024, 10, 21).unwrap());
    assert_eq!(goals[0].status, GoalStatus::InProgress);
}

#[test]
fn unparseable_blob_falls_back_to_empty_list() {
    let store = MemoryStore::new();
    store.set_item(ACTIVITIES_KEY, "{not json").unwrap();
    let manager = FootprintManager::open(
        Box::new(store),
        FactorTable::builtin(),
        Box::new(FixedClock::new(today())),
    )
    .unwrap();
    assert!(manager.ledger().is_empty());
}

#[test]
fn quota_failure_keeps_the_in_memory_entry() {
    let mut manager = FootprintManager::open(
        Box::new(MemoryStore::with_quota(160)),
        FactorTable::builtin(),
        Box::new(FixedClock::new(today())),
    )
    .unwrap();

    let first = manager
        .add_activity(ActivityType::Transport, "bus", 3.0, today())
        .unwrap();
    assert!(first.is_persisted());

    let second = manager
        .add_activity(ActivityType::Transport, "train", 30.0, today())
        .unwrap();
    assert!(matches!(
        second.persisted,
        Err(StorageError::QuotaExceeded { .. })
    ));
    assert_eq!(manager.ledger().len(), 2);
    assert_eq!(manager.ledger().activities()[0].id, second.entry.id);
}

#[test]
fn ids_stay_unique_across_reopen() {
    let home = temp_home();
    let first_id = {
        let mut manager = open_manager(&home);
        manager
            .add_activity(ActivityType::Energy, "electricity", 1.0, today())
            .unwrap()
            .entry
            .id
    };
    let mut manager = open_manager(&home);
    let second_id = manager
        .add_activity(ActivityType::Energy, "electricity", 1.0, today())
        .unwrap()
        .entry
        .id;
    assert!(second_id > first_id);
}

#[test]
fn restoring_a_backup_rolls_back_the_list() {
    let home = temp_home();
    let store = file_store(&home);
    let mut manager = open_manager(&home);
    let _ = manager
        .add_activity(ActivityType::Transport, "car", 10.0, today())
        .unwrap();
    let _ = manager
        .add_activity(ActivityType::Transport, "car", 20.0, today())
        .unwrap();

    let backups = store.list_backups(ACTIVITIES_KEY).unwrap();
    assert_eq!(backups.len(), 1);
    store.restore(&backups[0]).unwrap();
    manager.reload().unwrap();
    assert_eq!(manager.ledger().len(), 1);
    assert_eq!(manager.ledger().activities()[0].amount, 10.0);
}

#[test]
fn pruning_drops_the_oldest_backups_first() {
    let home = temp_home();
    let store = file_store(&home);
    for idx in 0..6 {
        store.set_item(GOALS_KEY, &format!("[{idx}]")).unwrap();
    }
    let backups = store.list_backups(GOALS_KEY).unwrap();
    assert_eq!(backups.len(), store.retention());
    let contents: Vec<String> = backups
        .iter()
        .map(|info| std::fs::read_to_string(&info.path).unwrap())
        .collect();
    assert_eq!(contents, vec!["[4]", "[3]", "[2]"]);

    store.restore(&backups[0]).unwrap();
    assert_eq!(store.get_item(GOALS_KEY).unwrap().as_deref(), Some("[4]"));
    let after_restore = store.list_backups(GOALS_KEY).unwrap();
    assert_eq!(std::fs::read_to_string(&after_restore[0].path).unwrap(), "[5]");
}

#[test]
fn labelled_backups_share_the_same_ordering() {
    let home = temp_home();
    let store = file_store(&home);
    store.set_item(GOALS_KEY, "[0]").unwrap();
    for idx in 1..4 {
        store
            .backup(GOALS_KEY, Some(&format!("step {idx}")))
            .unwrap()
            .expect("backup written");
        store.set_item(GOALS_KEY, &format!("[{idx}]")).unwrap();
    }
    let names: Vec<String> = store
        .list_backups(GOALS_KEY)
        .unwrap()
        .into_iter()
        .map(|info| info.name)
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|name| !name.ends_with("step-1.json")), "{names:?}");
    let newest = store.list_backups(GOALS_KEY).unwrap().remove(0);
    assert_eq!(std::fs::read_to_string(&newest.path).unwrap(), "[2]");
}

#[test]
fn overflowing_activity_does_not_wipe_the_stored_list() {
    let home = temp_home();
    {
        let mut manager = open_manager(&home);
        let _ = manager
            .add_activity(ActivityType::Transport, "car", 15.0, today())
            .unwrap();
        let err = manager
            .add_activity(ActivityType::Shopping, "electronics", 1e308, today())
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(manager.ledger().len(), 1);
    }
    let reopened = open_manager(&home);
    assert_eq!(reopened.ledger().len(), 1);
    assert_eq!(reopened.ledger().activities()[0].detail, "car");
}
