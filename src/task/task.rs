//! Task entity model.
//!
//! # Invariants
//! - A `Task` built through `from_form` or accepted by `validate` has a
//!   non-empty title, `1 <= estimated_hours <= MAX_ESTIMATED_HOURS` and
//!   `1 <= importance <= 10`.
//! - `dependencies` are opaque indices; they are never resolved locally.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Upper bound on the effort estimate of a single task.
pub const MAX_ESTIMATED_HOURS: u32 = 100;

/// Importance bounds (inclusive).
pub const MIN_IMPORTANCE: u8 = 1;
pub const MAX_IMPORTANCE: u8 = 10;

/// Date format used on the wire and in form entry.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejection reasons at the task input boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Task title must not be empty")]
    EmptyTitle,

    #[error("Task title is longer than {max} characters", max = MAX_TITLE_LEN)]
    TitleTooLong,

    #[error("Invalid due date '{0}' (expected YYYY-MM-DD)")]
    InvalidDueDate(String),

    #[error("Due date {due} is before today ({today})")]
    DueDateInPast { due: NaiveDate, today: NaiveDate },

    #[error("Estimated hours must be a whole number, got '{0}'")]
    InvalidHours(String),

    #[error("Estimated hours must be between 1 and {max}, got {0}", max = MAX_ESTIMATED_HOURS)]
    HoursOutOfRange(u32),

    #[error("Importance must be a whole number, got '{0}'")]
    InvalidImportance(String),

    #[error("Importance must be between {min} and {max}, got {0}", min = MIN_IMPORTANCE, max = MAX_IMPORTANCE)]
    ImportanceOutOfRange(i64),

    #[error("Dependency '{0}' is not a task number")]
    InvalidDependency(String),
}

/// A task as entered by the user, before analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// 1-based position in a submitted batch; only set while building a request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,

    /// Deduplication key on the merge path
    pub title: String,

    pub due_date: NaiveDate,

    pub estimated_hours: u32,

    pub importance: u8,

    /// Indices of other tasks; passed through untouched
    #[serde(default)]
    pub dependencies: Vec<u32>,
}

/// Raw text captured by the single-task entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub due_date: String,
    pub estimated_hours: String,
    pub importance: String,
    /// Comma-separated task numbers, may be blank
    pub dependencies: String,
}

impl Task {
    /// Create a task without input-boundary checks.
    pub fn new(
        title: impl Into<String>,
        due_date: NaiveDate,
        estimated_hours: u32,
        importance: u8,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            due_date,
            estimated_hours,
            importance,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<u32>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Parse and validate a form submission.
    ///
    /// # Errors
    ///
    /// Every malformed field is reported; no value is coerced to a default.
    /// Due dates before `today` are rejected here and only here.
    pub fn from_form(form: &TaskForm, today: NaiveDate) -> Result<Self, TaskError> {
        let due_raw = form.due_date.trim();
        let due_date = NaiveDate::parse_from_str(due_raw, DATE_FORMAT)
            .map_err(|_| TaskError::InvalidDueDate(due_raw.to_string()))?;
        if due_date < today {
            return Err(TaskError::DueDateInPast {
                due: due_date,
                today,
            });
        }

        let hours_raw = form.estimated_hours.trim();
        let estimated_hours = hours_raw
            .parse::<u32>()
            .map_err(|_| TaskError::InvalidHours(hours_raw.to_string()))?;

        let importance_raw = form.importance.trim();
        let importance = importance_raw
            .parse::<i64>()
            .map_err(|_| TaskError::InvalidImportance(importance_raw.to_string()))?;
        let importance = u8::try_from(importance)
            .map_err(|_| TaskError::ImportanceOutOfRange(importance))?;

        let task = Task {
            id: None,
            title: form.title.trim().to_string(),
            due_date,
            estimated_hours,
            importance,
            dependencies: parse_dependencies(&form.dependencies)?,
        };
        task.validate()?;
        Ok(task)
    }

    /// Structural checks shared by form entry and bulk import.
    ///
    /// The due date is not checked: imported tasks may already be overdue.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(TaskError::TitleTooLong);
        }
        if self.estimated_hours == 0 || self.estimated_hours > MAX_ESTIMATED_HOURS {
            return Err(TaskError::HoursOutOfRange(self.estimated_hours));
        }
        if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&self.importance) {
            return Err(TaskError::ImportanceOutOfRange(i64::from(self.importance)));
        }
        Ok(())
    }
}

/// Parse a comma-separated list of task numbers. Blank input is empty.
pub fn parse_dependencies(raw: &str) -> Result<Vec<u32>, TaskError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(str::trim)
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| TaskError::InvalidDependency(part.to_string()))
        })
        .collect()
}

/// A task as returned by the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedTask {
    #[serde(flatten)]
    pub task: Task,

    /// Score assigned by the service (roughly 0..100, may exceed it)
    pub priority_score: f64,

    /// Rationale from the service, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Ranking policy selector forwarded to the scoring service.
///
/// The client never interprets a strategy; it only names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    SmartBalance,
    FastestWins,
    HighImpact,
    DeadlineDriven,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "Smart Balance",
            Strategy::FastestWins => "Fastest Wins",
            Strategy::HighImpact => "High Impact",
            Strategy::DeadlineDriven => "Deadline Driven",
        }
    }

    /// Display label for a strategy identifier echoed by the service.
    /// Unknown identifiers are shown verbatim.
    pub fn label_for(raw: &str) -> String {
        raw.parse::<Strategy>()
            .map(|s| s.display_name().to_string())
            .unwrap_or_else(|_| raw.to_string())
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown strategy '{0}' (expected one of smart_balance, fastest_wins, high_impact, deadline_driven)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == wanted)
            .ok_or_else(|| UnknownStrategy(wanted.to_string()))
    }
}
