//! Priority tiers and text rendering of tasks and results.
//!
//! Results are rendered in the order the service returned them; ranking is
//! the service's job.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::task::{AnalyzedTask, Strategy, Task};

/// Shown when the service gave no rationale.
pub const NO_EXPLANATION: &str = "No explanation available";

/// Score thresholds for the tiers (inclusive lower bounds).
pub const HIGH_THRESHOLD: f64 = 80.0;
pub const MEDIUM_THRESHOLD: f64 = 50.0;

/// Discrete priority bucket derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    /// Total over all `f64`; NaN falls through to `Low`.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            PriorityTier::High
        } else if score >= MEDIUM_THRESHOLD {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::High => "high",
            PriorityTier::Medium => "medium",
            PriorityTier::Low => "low",
        }
    }

    /// Badge text.
    pub fn badge(&self) -> &'static str {
        match self {
            PriorityTier::High => "HIGH",
            PriorityTier::Medium => "MEDIUM",
            PriorityTier::Low => "LOW",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round half up, so 64.5 shows as 65 and -0.5 as 0.
pub fn rounded_score(score: f64) -> i64 {
    (score + 0.5).floor() as i64
}

/// Display fields of one analyzed task.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTask {
    /// 1-based position in the result sequence
    pub rank: usize,
    pub title: String,
    pub tier: PriorityTier,
    pub due_date: String,
    pub effort: String,
    pub importance: String,
    pub dependency_count: usize,
    pub explanation: String,
    pub score: String,
}

impl RenderedTask {
    pub fn new(rank: usize, analyzed: &AnalyzedTask) -> Self {
        let task = &analyzed.task;
        let explanation = analyzed
            .explanation
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(NO_EXPLANATION)
            .to_string();

        Self {
            rank,
            title: task.title.clone(),
            tier: PriorityTier::from_score(analyzed.priority_score),
            due_date: task.due_date.to_string(),
            effort: format!("{}h", task.estimated_hours),
            importance: format!("{}/10", task.importance),
            dependency_count: task.dependencies.len(),
            explanation,
            score: rounded_score(analyzed.priority_score).to_string(),
        }
    }
}

impl fmt::Display for RenderedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}. {} [{}]", self.rank, self.title, self.tier.badge())?;
        writeln!(
            f,
            "   Due Date: {} | Effort: {} | Importance: {} | Dependencies: {}",
            self.due_date, self.effort, self.importance, self.dependency_count
        )?;
        writeln!(f, "   {}", self.explanation)?;
        write!(f, "   Priority Score: {}", self.score)
    }
}

/// What the results panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    /// The service returned no tasks. Not an error.
    Empty,
    Ranked {
        strategy_label: String,
        tasks: Vec<RenderedTask>,
    },
}

impl ResultView {
    pub fn from_results(strategy: &str, tasks: &[AnalyzedTask]) -> Self {
        if tasks.is_empty() {
            return ResultView::Empty;
        }
        ResultView::Ranked {
            strategy_label: Strategy::label_for(strategy),
            tasks: tasks
                .iter()
                .enumerate()
                .map(|(index, task)| RenderedTask::new(index + 1, task))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResultView::Empty)
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultView::Empty => write!(f, "No tasks to display."),
            ResultView::Ranked {
                strategy_label,
                tasks,
            } => {
                writeln!(f, "Strategy: {}", strategy_label)?;
                write!(f, "Sorted by priority score (higher = more important)")?;
                for task in tasks {
                    write!(f, "\n\n{}", task)?;
                }
                Ok(())
            }
        }
    }
}

/// Text view of the current task store.
pub struct TaskListView<'a>(pub &'a [Task]);

impl fmt::Display for TaskListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No tasks added yet.");
        }
        for (index, task) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}. {}\n   Due: {} | Hours: {} | Importance: {}",
                index + 1,
                task.title,
                task.due_date,
                task.estimated_hours,
                task.importance
            )?;
            if !task.dependencies.is_empty() {
                let deps: Vec<String> = task.dependencies.iter().map(u32::to_string).collect();
                write!(f, " | Dependencies: {}", deps.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn analyzed(title: &str, score: f64, explanation: Option<&str>) -> AnalyzedTask {
        AnalyzedTask {
            task: Task::new(title, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 2, 7),
            priority_score: score,
            explanation: explanation.map(str::to_string),
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(PriorityTier::from_score(80.0), PriorityTier::High);
        assert_eq!(PriorityTier::from_score(150.0), PriorityTier::High);
        assert_eq!(PriorityTier::from_score(79.999), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_score(50.0), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_score(49.999), PriorityTier::Low);
        assert_eq!(PriorityTier::from_score(0.0), PriorityTier::Low);
        assert_eq!(PriorityTier::from_score(-5.0), PriorityTier::Low);
        assert_eq!(PriorityTier::from_score(f64::NAN), PriorityTier::Low);
    }

    #[test]
    fn test_rounded_score_rounds_half_up() {
        assert_eq!(rounded_score(65.0), 65);
        assert_eq!(rounded_score(64.5), 65);
        assert_eq!(rounded_score(64.49), 64);
        assert_eq!(rounded_score(-0.5), 0);
        assert_eq!(rounded_score(-2.5), -2);
    }

    #[test]
    fn test_single_result_renders_rank_tier_and_score() {
        let view = ResultView::from_results("fastest_wins", &[analyzed("A", 65.0, Some("due soon"))]);
        let ResultView::Ranked {
            strategy_label,
            tasks,
        } = &view
        else {
            panic!("expected ranked view");
        };
        assert_eq!(strategy_label, "Fastest Wins");
        assert_eq!(tasks[0].rank, 1);
        assert_eq!(tasks[0].tier, PriorityTier::Medium);
        assert_eq!(tasks[0].score, "65");
        assert_eq!(tasks[0].effort, "2h");
        assert_eq!(tasks[0].importance, "7/10");
        assert_eq!(tasks[0].dependency_count, 0);

        let text = view.to_string();
        assert!(text.contains("1. A [MEDIUM]"));
        assert!(text.contains("Priority Score: 65"));
        assert!(text.contains("due soon"));
    }

    #[test]
    fn test_results_keep_service_order() {
        let view = ResultView::from_results(
            "smart_balance",
            &[analyzed("low first", 10.0, None), analyzed("high second", 90.0, None)],
        );
        let ResultView::Ranked { tasks, .. } = view else {
            panic!("expected ranked view");
        };
        assert_eq!(tasks[0].title, "low first");
        assert_eq!(tasks[0].rank, 1);
        assert_eq!(tasks[1].tier, PriorityTier::High);
    }

    #[test]
    fn test_missing_or_blank_explanation_uses_fallback() {
        let rendered = RenderedTask::new(1, &analyzed("A", 1.0, None));
        assert_eq!(rendered.explanation, NO_EXPLANATION);
        let rendered = RenderedTask::new(1, &analyzed("A", 1.0, Some("  ")));
        assert_eq!(rendered.explanation, NO_EXPLANATION);
    }

    #[test]
    fn test_empty_results_render_no_tasks_state() {
        let view = ResultView::from_results("smart_balance", &[]);
        assert!(view.is_empty());
        assert_eq!(view.to_string(), "No tasks to display.");
    }

    #[test]
    fn test_unknown_strategy_label_is_verbatim() {
        let view = ResultView::from_results("experimental", &[analyzed("A", 1.0, None)]);
        assert!(view.to_string().starts_with("Strategy: experimental"));
    }

    #[test]
    fn test_task_list_view() {
        assert_eq!(TaskListView(&[]).to_string(), "No tasks added yet.");

        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let tasks = vec![
            Task::new("A", date, 2, 7),
            Task::new("B", date, 1, 3).with_dependencies(vec![1, 4]),
        ];
        let text = TaskListView(&tasks).to_string();
        assert_eq!(
            text,
            "1. A\n   Due: 2025-01-02 | Hours: 2 | Importance: 7\n\
             2. B\n   Due: 2025-01-02 | Hours: 1 | Importance: 3 | Dependencies: 1, 4"
        );
    }
}
