//! In-memory task store for the current session (non-persistent).

use super::merge::{merge_batch, DedupPolicy, MergeOutcome};
use super::Task;

/// Ordered list of locally known tasks.
///
/// Insertion order is both display order and submission order. The only
/// mutations are `add`, `merge` and `clear`.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a manually entered task. Duplicate titles are accepted here.
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Merge a bulk-imported batch under `policy`.
    pub fn merge(&mut self, batch: Vec<Task>, policy: DedupPolicy) -> MergeOutcome {
        merge_batch(&mut self.tasks, batch, policy)
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Copy of the store with `id` set to each task's 1-based position.
    pub fn snapshot_for_submission(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(index, task)| Task {
                id: Some(index as u32 + 1),
                ..task.clone()
            })
            .collect()
    }
}
