//! Client side of the remote scoring service.
//!
//! The service owns the ranking algorithm; this module only knows its
//! request/response contract:
//!
//! - `POST /api/tasks/analyze/` with `{tasks, strategy}` → `{tasks, strategy}`
//! - `GET /api/tasks/suggest/` → `{suggested_tasks}`
//! - failures are non-2xx with `{error}`

mod error;
mod http;

pub use error::{error_message_from_body, ServiceError, ServiceErrorKind};
pub use http::HttpScoringClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::task::{AnalyzedTask, Strategy, Task};

/// Body of an analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub tasks: Vec<Task>,
    pub strategy: Strategy,
}

/// Successful analysis response; tasks come back in the service's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub tasks: Vec<AnalyzedTask>,
    /// Echoed strategy, kept verbatim
    pub strategy: String,
}

/// Successful suggestion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestResponse {
    /// A body without this field reads as no suggestions, same as an empty list
    #[serde(default)]
    pub suggested_tasks: Vec<AnalyzedTask>,
}

/// Trait for scoring service clients.
#[async_trait]
pub trait ScoringClient: Send + Sync {
    /// Score and rank the given tasks.
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, ServiceError>;

    /// Ask the service for its own set of suggested tasks.
    async fn suggest(&self) -> Result<SuggestResponse, ServiceError>;
}
