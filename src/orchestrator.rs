//! Request orchestration against the scoring service.
//!
//! # State Machine
//! ```text
//! Idle -> Busy -> Idle          (success)
//!             \-> Error(msg)    (failure; cleared by the next action)
//! ```
//!
//! Only one request may be in flight. A second submission while `Busy` is
//! rejected with `ConsoleError::RequestInFlight`; it is neither queued nor
//! allowed to race the first one for the result set.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ConsoleError;
use crate::import::ImportBuffer;
use crate::render::ResultView;
use crate::scoring::{AnalyzeRequest, ScoringClient, ServiceError};
use crate::task::{AnalyzedTask, DedupPolicy, Strategy, Task, TaskForm, TaskStore};

/// Lifecycle of the request slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Busy,
    /// Last action failed; holds the user-facing message
    Error(String),
}

impl RequestState {
    pub fn is_busy(&self) -> bool {
        matches!(self, RequestState::Busy)
    }
}

/// The most recent successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    /// Strategy identifier as reported by the service
    pub strategy: String,
    pub tasks: Vec<AnalyzedTask>,
}

impl ResultSet {
    pub fn view(&self) -> ResultView {
        ResultView::from_results(&self.strategy, &self.tasks)
    }
}

/// Holds the request slot for the duration of one action.
///
/// Dropping the guard without `finish` (a cancelled future) returns the
/// slot to `Idle`, so the console is never left busy by an abandoned call.
struct BusyGuard<'a> {
    state: &'a Mutex<RequestState>,
    finished: bool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(state: &'a Mutex<RequestState>) -> Result<Self, ConsoleError> {
        let mut current = lock_state(state);
        if current.is_busy() {
            return Err(ConsoleError::RequestInFlight);
        }
        *current = RequestState::Busy;
        Ok(Self {
            state,
            finished: false,
        })
    }

    fn finish(mut self, error: Option<&ConsoleError>) {
        *lock_state(self.state) = match error {
            Some(e) => RequestState::Error(e.to_string()),
            None => RequestState::Idle,
        };
        self.finished = true;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *lock_state(self.state) = RequestState::Idle;
        }
    }
}

fn lock_state(state: &Mutex<RequestState>) -> MutexGuard<'_, RequestState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the session's task store, pending import, results and request state.
///
/// All methods take `&self`; share it behind an `Arc` if several tasks need it.
pub struct RequestOrchestrator<C> {
    client: C,
    store: RwLock<TaskStore>,
    import: RwLock<ImportBuffer>,
    results: RwLock<Option<ResultSet>>,
    state: Mutex<RequestState>,
    request_timeout: Duration,
    dedup_policy: DedupPolicy,
}

impl<C: ScoringClient> RequestOrchestrator<C> {
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            store: RwLock::new(TaskStore::new()),
            import: RwLock::new(ImportBuffer::new()),
            results: RwLock::new(None),
            state: Mutex::new(RequestState::Idle),
            request_timeout: config.request_timeout,
            dedup_policy: config.dedup_policy,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn state(&self) -> RequestState {
        lock_state(&self.state).clone()
    }

    pub fn last_error(&self) -> Option<String> {
        match &*lock_state(&self.state) {
            RequestState::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Drop a displayed error; a running request keeps its `Busy` state.
    fn dismiss_error(&self) {
        let mut state = lock_state(&self.state);
        if matches!(*state, RequestState::Error(_)) {
            *state = RequestState::Idle;
        }
    }

    /// Show a failure that happened outside the request slot.
    fn record_error(&self, error: &ConsoleError) {
        let mut state = lock_state(&self.state);
        if !state.is_busy() {
            *state = RequestState::Error(error.to_string());
        }
    }

    /// Append a task; duplicates are accepted on this path.
    pub async fn add_task(&self, task: Task) {
        self.dismiss_error();
        let mut store = self.store.write().await;
        store.add(task);
        debug!("Added task #{} to store", store.len());
    }

    /// Validate a form submission and append it.
    pub async fn add_task_from_form(
        &self,
        form: &TaskForm,
        today: NaiveDate,
    ) -> Result<Task, ConsoleError> {
        self.dismiss_error();
        let task = match Task::from_form(form, today) {
            Ok(task) => task,
            Err(e) => {
                let error = ConsoleError::InvalidTask(e);
                self.record_error(&error);
                return Err(error);
            }
        };
        self.add_task(task.clone()).await;
        Ok(task)
    }

    /// Put pasted text in the import buffer. It is merged on the next analysis.
    pub async fn stage_import(&self, text: impl Into<String>) {
        self.dismiss_error();
        self.import.write().await.stage(text);
    }

    pub async fn has_pending_import(&self) -> bool {
        self.import.read().await.is_pending()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.store.read().await.list().to_vec()
    }

    pub async fn results(&self) -> Option<ResultSet> {
        self.results.read().await.clone()
    }

    /// View of the current results; `None` before the first success.
    pub async fn render_results(&self) -> Option<ResultView> {
        self.results.read().await.as_ref().map(ResultSet::view)
    }

    /// Reset the session: tasks, pending import, results and any error.
    pub async fn clear_all(&self) {
        self.store.write().await.clear();
        self.import.write().await.clear();
        *self.results.write().await = None;
        self.dismiss_error();
        info!("Cleared all tasks and results");
    }

    /// Merge any pending import, then send the store for analysis.
    ///
    /// # Errors
    ///
    /// - `RequestInFlight` if another request is running
    /// - `ImportParse` if the pending import is malformed (store untouched)
    /// - `EmptyInput` if there is nothing to analyze (no request is sent)
    /// - `AnalysisRequest` / `Timeout` if the service call fails
    pub async fn submit_analysis(&self, strategy: Strategy) -> Result<ResultView, ConsoleError> {
        let guard = BusyGuard::acquire(&self.state)?;
        let outcome = self.run_analysis(strategy).await;
        guard.finish(outcome.as_ref().err());
        outcome
    }

    async fn run_analysis(&self, strategy: Strategy) -> Result<ResultView, ConsoleError> {
        let request = {
            let mut store = self.store.write().await;
            let mut import = self.import.write().await;

            if import.is_pending() {
                let batch = import.parse()?;
                let batch_len = batch.len();
                let merged = store.merge(batch, self.dedup_policy);
                import.clear();
                info!(
                    "Imported {} of {} tasks ({} skipped by {} policy)",
                    merged.accepted,
                    batch_len,
                    merged.skipped.len(),
                    self.dedup_policy.as_str()
                );
                if !merged.skipped.is_empty() {
                    debug!("Skipped duplicate tasks: {:?}", merged.skipped);
                }
            }

            if store.is_empty() {
                return Err(ConsoleError::EmptyInput);
            }

            AnalyzeRequest {
                tasks: store.snapshot_for_submission(),
                strategy,
            }
        };

        info!(
            "Submitting {} tasks for analysis (strategy={})",
            request.tasks.len(),
            strategy
        );

        let response = self
            .bounded("Analysis request", self.client.analyze(&request))
            .await?
            .map_err(|e| {
                warn!("Analysis failed: {}", e);
                ConsoleError::AnalysisRequest { message: e.message }
            })?;

        info!("Received {} analyzed tasks", response.tasks.len());
        let results = ResultSet {
            strategy: response.strategy,
            tasks: response.tasks,
        };
        let view = results.view();
        *self.results.write().await = Some(results);
        Ok(view)
    }

    /// Ask the service for its own suggested tasks. Independent of the store.
    pub async fn request_suggestions(&self) -> Result<ResultView, ConsoleError> {
        let guard = BusyGuard::acquire(&self.state)?;
        let outcome = self.run_suggestions().await;
        guard.finish(outcome.as_ref().err());
        outcome
    }

    async fn run_suggestions(&self) -> Result<ResultView, ConsoleError> {
        info!("Requesting task suggestions");
        let response = self
            .bounded("Suggestion request", self.client.suggest())
            .await?
            .map_err(|e| {
                warn!("Suggestion request failed: {}", e);
                ConsoleError::SuggestionRequest { message: e.message }
            })?;

        info!("Received {} suggested tasks", response.suggested_tasks.len());
        let results = ResultSet {
            strategy: Strategy::SmartBalance.as_str().to_string(),
            tasks: response.suggested_tasks,
        };
        let view = results.view();
        *self.results.write().await = Some(results);
        Ok(view)
    }

    /// Apply the request timeout to a service call.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, ServiceError>>,
    ) -> Result<Result<T, ServiceError>, ConsoleError> {
        tokio::time::timeout(self.request_timeout, call)
            .await
            .map_err(|_| {
                warn!("{} timed out after {:?}", operation, self.request_timeout);
                ConsoleError::Timeout {
                    operation,
                    after: self.request_timeout,
                }
            })
    }
}
