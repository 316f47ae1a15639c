//! Task module - task entities, the session store and batch merging.
//!
//! - `task`: `Task`, `AnalyzedTask`, `Strategy` and input-boundary validation
//! - `store`: ordered in-memory store, the single source of the task list
//! - `merge`: dedup policies applied when a bulk batch joins the store

pub mod task;
mod merge;
mod store;

pub use merge::{merge_batch, DedupPolicy, MergeOutcome};
pub use store::TaskStore;
pub use task::{
    parse_dependencies, AnalyzedTask, Strategy, Task, TaskError, TaskForm, UnknownStrategy,
};
