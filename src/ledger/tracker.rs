use chrono::NaiveDate;

use crate::errors::{EcoError, Result};

use super::{
    common::{IdSequence, Identifiable},
    goal::{Goal, GoalId, GoalKind, GoalStatus},
};

/// Creation-ordered list of reduction goals.
///
/// Progress is only ever changed through [`GoalTracker::update_progress`]; logging an
/// activity does not touch any goal.
#[derive(Debug, Clone, Default)]
pub struct GoalTracker {
    goals: Vec<Goal>,
    ids: IdSequence,
}

impl GoalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_goals(goals: Vec<Goal>) -> Self {
        let ids = IdSequence::after(goals.iter().map(Identifiable::raw_id));
        Self { goals, ids }
    }

    pub fn add_goal(
        &mut self,
        target: f64,
        description: &str,
        deadline: NaiveDate,
    ) -> Result<&Goal> {
        self.add_goal_of_kind(None, target, description, deadline)
    }

    pub fn add_goal_of_kind(
        &mut self,
        kind: Option<GoalKind>,
        target: f64,
        description: &str,
        deadline: NaiveDate,
    ) -> Result<&Goal> {
        if !target.is_finite() || target <= 0.0 {
            return Err(EcoError::InvalidInput(format!(
                "goal target must be a positive number, got {target}"
            )));
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(EcoError::InvalidInput(
                "goal description must not be empty".into(),
            ));
        }
        let goal = Goal {
            id: GoalId(self.ids.allocate()),
            kind,
            target,
            current: 0.0,
            deadline,
            description: description.to_string(),
            status: GoalStatus::InProgress,
        };
        tracing::debug!(id = %goal.id, target, %deadline, "goal added");
        self.goals.push(goal);
        let index = self.goals.len() - 1;
        Ok(&self.goals[index])
    }

    /// Sets the progress of a goal. Reaching the target completes an open goal.
    pub fn update_progress(&mut self, id: GoalId, current: f64) -> Result<&Goal> {
        if !current.is_finite() {
            return Err(EcoError::InvalidInput(format!(
                "goal progress must be a finite number, got {current}"
            )));
        }
        let goal = self
            .goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or(EcoError::GoalNotFound(id))?;
        goal.current = current;
        if goal.is_open() && goal.is_reached() {
            goal.status = GoalStatus::Completed;
        }
        tracing::debug!(id = %goal.id, current, status = %goal.status, "goal progress updated");
        Ok(&*goal)
    }

    /// Fails open goals whose deadline is before `today` without the target reached.
    /// Returns the number of goals whose status changed.
    pub fn evaluate(&mut self, today: NaiveDate) -> usize {
        let mut changed = 0;
        for goal in self.goals.iter_mut().filter(|goal| goal.is_open()) {
            if goal.is_reached() {
                goal.status = GoalStatus::Completed;
                changed += 1;
            } else if goal.deadline < today {
                goal.status = GoalStatus::Failed;
                changed += 1;
            }
        }
        changed
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub(crate) fn replace_goals(&mut self, goals: Vec<Goal>) {
        self.ids = IdSequence::after(goals.iter().map(Identifiable::raw_id));
        self.goals = goals;
    }
}
