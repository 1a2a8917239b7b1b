//! Savings goal model
//!
//! A goal tracks progress toward a target amount by a target date. The
//! `category` is free text, unrelated to transaction categories.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::date;
use super::ids::GoalId;
use super::money::Money;
use crate::calculations;

/// Lifecycle state of a goal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl GoalStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A savings goal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub tags: String,
    pub description: String,
    pub target_amount: Money,
    pub current_amount: Money,
    #[serde(with = "date::flexible_option")]
    pub target_date: Option<NaiveDate>,
    /// Free-text grouping such as "Emergency" or "Travel"
    pub category: String,
    pub status: GoalStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Goal {
    /// Percentage of the target reached, clamped to 0..=100
    pub fn progress(&self) -> f64 {
        calculations::goal_progress(self.current_amount, self.target_amount)
    }

    /// Amount still needed, never negative
    pub fn remaining(&self) -> Money {
        self.target_amount.saturating_remaining(self.current_amount)
    }

    pub fn is_completed(&self) -> bool {
        self.status == GoalStatus::Completed
    }

    /// The target date has passed and the goal is not completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.target_date {
            Some(target) => target < today && !self.is_completed(),
            None => false,
        }
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }
        if self.current_amount.is_negative() {
            return Err(GoalValidationError::NegativeCurrent(self.current_amount));
        }
        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} of {})",
            self.name, self.current_amount, self.target_amount
        )
    }
}

/// Partial goal used for create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<Money>,
    #[serde(
        default,
        with = "date::flexible_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GoalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GoalPatch {
    pub fn new(name: impl Into<String>, target_amount: Money) -> Self {
        Self {
            name: Some(name.into()),
            tags: Some(String::new()),
            description: Some(String::new()),
            target_amount: Some(target_amount),
            current_amount: Some(Money::zero()),
            status: Some(GoalStatus::Active),
            ..Default::default()
        }
    }

    /// Stamp both timestamps on a new goal
    pub fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    /// Re-stamp the modification time; the creation time is never rewritten
    pub fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.created_at = None;
        self.updated_at = Some(now);
    }

    pub fn apply_to(&self, goal: &mut Goal) {
        if let Some(name) = &self.name {
            goal.name = name.clone();
        }
        if let Some(tags) = &self.tags {
            goal.tags = tags.clone();
        }
        if let Some(description) = &self.description {
            goal.description = description.clone();
        }
        if let Some(target) = self.target_amount {
            goal.target_amount = target;
        }
        if let Some(current) = self.current_amount {
            goal.current_amount = current;
        }
        if self.target_date.is_some() {
            goal.target_date = self.target_date;
        }
        if let Some(category) = &self.category {
            goal.category = category.clone();
        }
        if let Some(status) = self.status {
            goal.status = status;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget(Money),
    NegativeCurrent(Money),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NonPositiveTarget(amount) => {
                write!(f, "Target amount must be greater than zero (got {})", amount)
            }
            Self::NegativeCurrent(amount) => {
                write!(f, "Current amount cannot be negative (got {})", amount)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}
