//! Narrow interface onto the CI provider consumed by the executor.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::CiProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Read-only snapshot of one provider workflow.
pub struct WorkflowSummary {
    pub id: i64,
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Read-only snapshot of one workflow run.
pub struct RunSummary {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub conclusion: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[async_trait]
/// Trait contract for the CI provider calls the executor sequences.
///
/// Every method is a single remote attempt; implementations must not retry.
pub trait CiProvider: Send + Sync {
    async fn list_workflows(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<WorkflowSummary>, CiProviderError>;

    /// Lists recent runs in provider order, scoped to one workflow when `workflow_id` is set.
    async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: Option<i64>,
    ) -> Result<Vec<RunSummary>, CiProviderError>;

    async fn dispatch_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: i64,
        git_ref: &str,
    ) -> Result<(), CiProviderError>;

    /// Returns the location of the log archive for one run attempt.
    async fn workflow_run_logs_url(
        &self,
        owner: &str,
        repo: &str,
        run_id: i64,
        attempt: u32,
    ) -> Result<String, CiProviderError>;
}
