use chrono::NaiveDate;

use crate::{
    errors::{Result, StorageError},
    ledger::{
        samples, Activity, ActivityType, EmissionLedger, FactorTable, Goal, GoalId, GoalTracker,
    },
    storage::{self, KeyValueStore, ACTIVITIES_KEY, GOALS_KEY},
};

use super::{
    services::{FootprintSummary, GoalOverview, SummaryService},
    time::Clock,
};

/// Outcome of a mutation: the new entry plus the result of writing it through.
///
/// A failed write does not undo the in-memory change; the caller decides whether to
/// retry with [`FootprintManager::flush`] or warn the user.
#[derive(Debug)]
#[must_use]
pub struct Recorded<T> {
    pub entry: T,
    pub persisted: std::result::Result<(), StorageError>,
}

impl<T> Recorded<T> {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }

    pub fn persist_error(&self) -> Option<&StorageError> {
        self.persisted.as_ref().err()
    }
}

/// Owns the activity ledger and goal list, and writes both through to a durable store.
pub struct FootprintManager {
    ledger: EmissionLedger,
    goals: GoalTracker,
    storage: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
}

impl FootprintManager {
    /// Loads both lists from `storage`, using empty lists for missing or unreadable keys.
    pub fn open(
        storage: Box<dyn KeyValueStore>,
        factors: FactorTable,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        Self::open_inner(storage, factors, clock, false)
    }

    /// Like [`FootprintManager::open`], but a key that has never been written is seeded
    /// with the sample activities or goals and persisted.
    pub fn open_seeded(
        storage: Box<dyn KeyValueStore>,
        factors: FactorTable,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        Self::open_inner(storage, factors, clock, true)
    }

    fn open_inner(
        storage: Box<dyn KeyValueStore>,
        factors: FactorTable,
        clock: Box<dyn Clock>,
        seed: bool,
    ) -> Result<Self> {
        let today = clock.today();
        let seed_activities = seed && storage.get_item(ACTIVITIES_KEY)?.is_none();
        let seed_goals = seed && storage.get_item(GOALS_KEY)?.is_none();

        let activities = if seed_activities {
            samples::sample_activities(today)
        } else {
            storage::load(storage.as_ref(), ACTIVITIES_KEY, Vec::new())?
        };
        let goals = if seed_goals {
            samples::sample_goals(today)
        } else {
            storage::load(storage.as_ref(), GOALS_KEY, Vec::new())?
        };

        let manager = Self {
            ledger: EmissionLedger::with_activities(factors, activities),
            goals: GoalTracker::with_goals(goals),
            storage,
            clock,
        };
        if seed_activities {
            manager.persist_activities()?;
        }
        if seed_goals {
            manager.persist_goals()?;
        }
        tracing::info!(
            activities = manager.ledger.len(),
            goals = manager.goals.len(),
            "footprint store opened"
        );
        Ok(manager)
    }

    /// Re-reads both lists from storage, replacing the in-memory copies.
    pub fn reload(&mut self) -> Result<()> {
        let activities = storage::load(self.storage.as_ref(), ACTIVITIES_KEY, Vec::new())?;
        let goals = storage::load(self.storage.as_ref(), GOALS_KEY, Vec::new())?;
        self.ledger.replace_activities(activities);
        self.goals.replace_goals(goals);
        tracing::info!(
            activities = self.ledger.len(),
            goals = self.goals.len(),
            "footprint store reloaded"
        );
        Ok(())
    }

    pub fn ledger(&self) -> &EmissionLedger {
        &self.ledger
    }

    pub fn goals(&self) -> &GoalTracker {
        &self.goals
    }

    pub fn factors(&self) -> &FactorTable {
        self.ledger.factors()
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn calculate_emission(&self, detail: &str, amount: f64) -> Result<f64> {
        self.ledger.calculate_emission(detail, amount)
    }

    pub fn add_activity(
        &mut self,
        activity_type: ActivityType,
        detail: &str,
        amount: f64,
        date: NaiveDate,
    ) -> Result<Recorded<Activity>> {
        let entry = self
            .ledger
            .add_activity(activity_type, detail, amount, date)?
            .clone();
        let persisted = self.persist_activities();
        Ok(Recorded { entry, persisted })
    }

    pub fn add_goal(
        &mut self,
        target: f64,
        description: &str,
        deadline: NaiveDate,
    ) -> Result<Recorded<Goal>> {
        let entry = self.goals.add_goal(target, description, deadline)?.clone();
        let persisted = self.persist_goals();
        Ok(Recorded { entry, persisted })
    }

    pub fn update_goal_progress(&mut self, id: GoalId, current: f64) -> Result<Recorded<Goal>> {
        let entry = self.goals.update_progress(id, current)?.clone();
        let persisted = self.persist_goals();
        Ok(Recorded { entry, persisted })
    }

    /// Settles goal statuses against today's date. The entry is the number of goals changed.
    pub fn evaluate_goals(&mut self) -> Recorded<usize> {
        let changed = self.goals.evaluate(self.clock.today());
        let persisted = if changed > 0 {
            self.persist_goals()
        } else {
            Ok(())
        };
        Recorded {
            entry: changed,
            persisted,
        }
    }

    /// Writes both lists again, e.g. after an earlier write failed.
    pub fn flush(&self) -> std::result::Result<(), StorageError> {
        self.persist_activities()?;
        self.persist_goals()?;
        tracing::info!("footprint store flushed");
        Ok(())
    }

    pub fn summary(&self) -> FootprintSummary {
        SummaryService::footprint(&self.ledger)
    }

    pub fn goal_overview(&self) -> GoalOverview {
        SummaryService::goals(&self.goals)
    }

    fn persist_activities(&self) -> std::result::Result<(), StorageError> {
        storage::save(self.storage.as_ref(), ACTIVITIES_KEY, self.ledger.activities())
            .inspect_err(|err| tracing::warn!(error = %err, "failed to persist activities"))
    }

    fn persist_goals(&self) -> std::result::Result<(), StorageError> {
        storage::save(self.storage.as_ref(), GOALS_KEY, self.goals.goals())
            .inspect_err(|err| tracing::warn!(error = %err, "failed to persist goals"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;
    use crate::storage::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn manager_with(store: MemoryStore) -> FootprintManager {
        FootprintManager::open(
            Box::new(store),
            FactorTable::builtin(),
            Box::new(FixedClock::new(today())),
        )
        .expect("open manager")
    }

    #[test]
    fn add_activity_writes_through() {
        let mut manager = manager_with(MemoryStore::new());
        let recorded = manager
            .add_activity(ActivityType::Transport, "car", 15.0, today())
            .unwrap();
        assert!(recorded.is_persisted());
        let raw = manager.storage().get_item(ACTIVITIES_KEY).unwrap().unwrap();
        let stored: Vec<Activity> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, vec![recorded.entry]);
    }

    #[test]
    fn quota_failure_keeps_in_memory_entry() {
        let mut manager = manager_with(MemoryStore::with_quota(16));
        let recorded = manager
            .add_activity(ActivityType::Food, "beef", 0.5, today())
            .unwrap();
        assert!(matches!(
            recorded.persist_error(),
            Some(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(manager.ledger().len(), 1);
        assert!(manager.flush().is_err());
    }

    #[test]
    fn validation_failure_does_not_write() {
        let mut manager = manager_with(MemoryStore::new());
        assert!(manager
            .add_activity(ActivityType::Food, "beef", -2.0, today())
            .is_err());
        assert!(manager.storage().get_item(ACTIVITIES_KEY).unwrap().is_none());
    }

    #[test]
    fn overflowing_emission_keeps_stored_list_readable() {
        let mut manager = manager_with(MemoryStore::new());
        let _ = manager
            .add_activity(ActivityType::Transport, "car", 15.0, today())
            .unwrap();
        let err = manager
            .add_activity(ActivityType::Shopping, "electronics", 1e308, today())
            .unwrap_err();
        assert!(err.is_validation());

        let raw = manager.storage().get_item(ACTIVITIES_KEY).unwrap().unwrap();
        assert!(!raw.contains("null"));
        let copy = MemoryStore::new();
        copy.set_item(ACTIVITIES_KEY, &raw).unwrap();
        let reopened = manager_with(copy);
        assert_eq!(reopened.ledger().len(), 1);
        assert_eq!(reopened.ledger().activities(), manager.ledger().activities());
    }

    #[test]
    fn seeded_open_writes_samples_once() {
        let manager = FootprintManager::open_seeded(
            Box::new(MemoryStore::new()),
            FactorTable::builtin(),
            Box::new(FixedClock::new(today())),
        )
        .unwrap();
        assert_eq!(manager.ledger().len(), 3);
        assert_eq!(manager.goals().len(), 2);
        assert!((manager.ledger().total_footprint() - 23.3).abs() < 1e-9);
        assert!(manager.storage().get_item(GOALS_KEY).unwrap().is_some());
    }

    #[test]
    fn evaluate_goals_persists_only_changes() {
        let mut manager = manager_with(MemoryStore::new());
        assert_eq!(manager.evaluate_goals().entry, 0);
        assert!(manager.storage().get_item(GOALS_KEY).unwrap().is_none());

        let overdue = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let _ = manager.add_goal(10.0, "overdue", overdue).unwrap();
        let outcome = manager.evaluate_goals();
        assert_eq!(outcome.entry, 1);
        assert!(outcome.is_persisted());
        assert_eq!(manager.goal_overview().failed, 1);
    }
}
