//! Goal service
//!
//! Savings goals: CRUD, the progress and overdue flags the goal cards show,
//! and contributions toward a target.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Goal, GoalId, GoalPatch, GoalStatus, Money};
use crate::storage::Storage;

/// Service for goal management
pub struct GoalService<'a> {
    storage: &'a Storage,
}

/// A goal with the figures derived from it on a given day
#[derive(Debug, Clone)]
pub struct GoalView {
    pub goal: Goal,
    pub progress: f64,
    pub remaining: Money,
    pub is_overdue: bool,
}

impl GoalView {
    pub fn new(goal: Goal, today: NaiveDate) -> Self {
        Self {
            progress: goal.progress(),
            remaining: goal.remaining(),
            is_overdue: goal.is_overdue(today),
            goal,
        }
    }
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> FinanceResult<Vec<Goal>> {
        self.storage.goals.get_all()
    }

    /// Goals with progress, optionally only those with `status`
    pub fn list_views(
        &self,
        status: Option<GoalStatus>,
        today: NaiveDate,
    ) -> FinanceResult<Vec<GoalView>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|g| status.map_or(true, |s| g.status == s))
            .map(|g| GoalView::new(g, today))
            .collect())
    }

    pub fn get(&self, id: GoalId) -> FinanceResult<Goal> {
        self.storage.goals.get_by_id(id)
    }

    pub fn create(&self, patch: GoalPatch) -> FinanceResult<Goal> {
        let mut candidate = Goal::default();
        patch.apply_to(&mut candidate);
        candidate
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let goal = self.storage.goals.create(patch)?;
        info!(id = %goal.id, name = %goal.name, target = %goal.target_amount, "goal created");
        Ok(goal)
    }

    pub fn edit(&self, id: GoalId, patch: GoalPatch) -> FinanceResult<Goal> {
        let mut candidate = self.get(id)?;
        patch.apply_to(&mut candidate);
        candidate
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        self.storage.goals.update(id, patch)
    }

    /// Add `amount` to the saved total. Reaching the target completes the
    /// goal; a completed goal accepts no more contributions.
    pub fn contribute(&self, id: GoalId, amount: Money) -> FinanceResult<Goal> {
        if !amount.is_positive() {
            return Err(FinanceError::Validation(
                "Contribution must be positive".into(),
            ));
        }

        let goal = self.get(id)?;
        if goal.is_completed() {
            return Err(FinanceError::Validation(format!(
                "Goal '{}' is already completed",
                goal.name
            )));
        }

        let current = goal.current_amount + amount;
        let mut patch = GoalPatch {
            current_amount: Some(current),
            ..Default::default()
        };
        if current >= goal.target_amount {
            patch.status = Some(GoalStatus::Completed);
        }

        let updated = self.storage.goals.update(id, patch)?;
        info!(%id, %amount, status = %updated.status, "goal contribution recorded");
        Ok(updated)
    }

    pub fn delete(&self, id: GoalId) -> FinanceResult<bool> {
        let deleted = self.storage.goals.delete(id)?;
        info!(%id, "goal deleted");
        Ok(deleted)
    }
}
