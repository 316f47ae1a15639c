//! Merge of a bulk-imported batch into the store.
//!
//! Incoming tasks are filtered against the *current store only*. Tasks that
//! repeat each other inside the same batch are all kept; collapsing them is
//! not this engine's job.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Task;

/// Which incoming tasks count as already present in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Exact, case-sensitive title equality.
    #[default]
    Title,
    /// Equal `id`; tasks without an id never match.
    Id,
    /// Accept everything, as single manual entry does.
    KeepAll,
}

impl DedupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupPolicy::Title => "title",
            DedupPolicy::Id => "id",
            DedupPolicy::KeepAll => "keep_all",
        }
    }
}

impl FromStr for DedupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(DedupPolicy::Title),
            "id" => Ok(DedupPolicy::Id),
            "keep_all" | "none" => Ok(DedupPolicy::KeepAll),
            other => Err(format!("unknown dedup policy '{}'", other)),
        }
    }
}

/// What a merge did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub accepted: usize,
    /// Titles of incoming tasks that were dropped, in batch order
    pub skipped: Vec<String>,
}

/// Append the tasks of `batch` that are not already in `existing`.
///
/// # Postconditions
/// - `existing` keeps its prefix; accepted tasks follow in batch order.
/// - `existing.len()` never decreases.
pub fn merge_batch(existing: &mut Vec<Task>, batch: Vec<Task>, policy: DedupPolicy) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    let known_titles: HashSet<String> = match policy {
        DedupPolicy::Title => existing.iter().map(|t| t.title.clone()).collect(),
        _ => HashSet::new(),
    };
    let known_ids: HashSet<u32> = match policy {
        DedupPolicy::Id => existing.iter().filter_map(|t| t.id).collect(),
        _ => HashSet::new(),
    };

    for task in batch {
        let present = match policy {
            DedupPolicy::Title => known_titles.contains(&task.title),
            DedupPolicy::Id => task.id.is_some_and(|id| known_ids.contains(&id)),
            DedupPolicy::KeepAll => false,
        };
        if present {
            outcome.skipped.push(task.title);
        } else {
            existing.push(task);
            outcome.accepted += 1;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(title: &str) -> Task {
        Task::new(title, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 2, 5)
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_title_duplicate_dropped_and_order_preserved() {
        let mut store = vec![task("T1"), task("T2")];
        let outcome = merge_batch(&mut store, vec![task("T1"), task("T3")], DedupPolicy::Title);

        assert_eq!(titles(&store), vec!["T1", "T2", "T3"]);
        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.skipped, vec!["T1".to_string()]);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut store = vec![task("T1"), task("T2")];
        let before = store.clone();
        let outcome = merge_batch(&mut store, Vec::new(), DedupPolicy::Title);
        assert_eq!(store, before);
        assert_eq!(outcome, MergeOutcome::default());
    }

    #[test]
    fn test_title_match_is_case_sensitive() {
        let mut store = vec![task("Deploy")];
        merge_batch(&mut store, vec![task("deploy")], DedupPolicy::Title);
        assert_eq!(titles(&store), vec!["Deploy", "deploy"]);
    }

    #[test]
    fn test_duplicates_within_batch_are_kept() {
        let mut store = vec![task("T1")];
        let outcome = merge_batch(
            &mut store,
            vec![task("T4"), task("T4"), task("T1")],
            DedupPolicy::Title,
        );
        assert_eq!(titles(&store), vec!["T1", "T4", "T4"]);
        assert_eq!(outcome.accepted, 2);
    }

    #[test]
    fn test_unique_store_stays_unique_after_one_merge() {
        let mut store = vec![task("a"), task("b"), task("c")];
        let batch = vec![task("c"), task("d"), task("a"), task("e")];
        let before = store.len();
        merge_batch(&mut store, batch, DedupPolicy::Title);

        assert!(store.len() >= before);
        let unique: HashSet<&str> = store.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(unique.len(), store.len());
    }

    #[test]
    fn test_id_policy_ignores_titles() {
        let mut first = task("T1");
        first.id = Some(1);
        let mut store = vec![first];

        let mut same_id = task("Other");
        same_id.id = Some(1);
        let mut new_id = task("T1");
        new_id.id = Some(2);
        let no_id = task("T1");

        let outcome = merge_batch(&mut store, vec![same_id, new_id, no_id], DedupPolicy::Id);
        assert_eq!(titles(&store), vec!["T1", "T1", "T1"]);
        assert_eq!(outcome.skipped, vec!["Other".to_string()]);
    }

    #[test]
    fn test_keep_all_accepts_everything() {
        let mut store = vec![task("T1")];
        let outcome = merge_batch(&mut store, vec![task("T1")], DedupPolicy::KeepAll);
        assert_eq!(store.len(), 2);
        assert_eq!(outcome.accepted, 1);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Title".parse::<DedupPolicy>().unwrap(), DedupPolicy::Title);
        assert_eq!("keep_all".parse::<DedupPolicy>().unwrap(), DedupPolicy::KeepAll);
        assert!("fuzzy".parse::<DedupPolicy>().is_err());
    }
}
