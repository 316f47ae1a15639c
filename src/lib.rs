//! # Task Console
//!
//! Client for a remote task-prioritization service.
//!
//! This library provides:
//! - A session task store fed by single entries and bulk JSON imports
//! - Title-based (or pluggable) dedup when an import is merged
//! - Request orchestration with a single in-flight request and a timeout
//! - Priority tiers and text rendering of ranked results
//!
//! ## Architecture
//!
//! ```text
//!   add / import ──► TaskStore ──► RequestOrchestrator ──► ScoringClient
//!                                          │                    (HTTP)
//!                                          ▼
//!                                     ResultView
//! ```
//!
//! ## Modules
//! - `task`: Task entities, store and merge policies
//! - `import`: Bulk-import buffer and parsing
//! - `scoring`: Scoring service contract and HTTP client
//! - `orchestrator`: Busy/error state machine around service calls
//! - `render`: Tiers and display models

pub mod config;
pub mod error;
pub mod import;
pub mod orchestrator;
pub mod render;
pub mod scoring;
pub mod task;

pub use config::Config;
pub use error::ConsoleError;
pub use orchestrator::{RequestOrchestrator, RequestState, ResultSet};
pub use render::{PriorityTier, ResultView, TaskListView};
pub use scoring::{HttpScoringClient, ScoringClient};
pub use task::{AnalyzedTask, DedupPolicy, Strategy, Task, TaskStore};
