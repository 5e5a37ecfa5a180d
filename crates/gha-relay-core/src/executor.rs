//! Sequences provider calls for one [`Command`] and folds the outcome into a
//! single [`ResponseEnvelope`].
//!
//! Steps run strictly in order under one deadline. The first failure ends the
//! command; nothing is retried, so a failed resolution never reaches dispatch.

use std::sync::Arc;
use std::time::Duration;

use crate::ci_provider::{CiProvider, RunSummary, WorkflowSummary};
use crate::command::{Command, ShortcutCommand, WorkflowRef, DEFAULT_GIT_REF};
use crate::envelope::{EnvelopeKind, EnvelopeLine, ResponseEnvelope, RunClassification};
use crate::error::DispatchError;
use crate::workflow_resolver::resolve_workflow;

pub const STATUS_RUN_LIMIT: usize = 5;
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
const LOG_ARCHIVE_ATTEMPT: u32 = 1;
const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecutionStep {
    ListWorkflows,
    ResolveWorkflow,
    Dispatch,
    ListRuns,
    FetchLogs,
}

impl ExecutionStep {
    fn failure_label(self) -> &'static str {
        match self {
            Self::ListWorkflows | Self::ResolveWorkflow => "Error listing workflows",
            Self::Dispatch => "Error running workflow",
            Self::ListRuns => "Error listing workflow runs",
            Self::FetchLogs => "Error getting logs",
        }
    }
}

#[derive(Debug)]
struct StepFailure {
    step: Option<ExecutionStep>,
    error: DispatchError,
}

trait StepResultExt<T> {
    fn at_step(self, step: ExecutionStep) -> Result<T, StepFailure>;
}

impl<T, E> StepResultExt<T> for Result<T, E>
where
    E: Into<DispatchError>,
{
    fn at_step(self, step: ExecutionStep) -> Result<T, StepFailure> {
        self.map_err(|error| StepFailure {
            step: Some(step),
            error: error.into(),
        })
    }
}

#[derive(Clone)]
/// Executes commands against a shared, read-only provider handle.
pub struct OperationExecutor {
    provider: Arc<dyn CiProvider>,
    command_timeout: Duration,
}

impl OperationExecutor {
    pub fn new(provider: Arc<dyn CiProvider>) -> Self {
        Self {
            provider,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout.max(Duration::from_millis(1));
        self
    }

    /// Runs `command` to completion. Failures become an `Error`-kind envelope.
    pub async fn execute(&self, command: &Command) -> ResponseEnvelope {
        let steps = self.run_steps(command);
        let outcome = match tokio::time::timeout(self.command_timeout, steps).await {
            Ok(outcome) => outcome,
            Err(_) => Err(StepFailure {
                step: None,
                error: DispatchError::Provider {
                    message: format!(
                        "command timed out after {} ms",
                        self.command_timeout.as_millis()
                    ),
                    timeout: true,
                },
            }),
        };
        match outcome {
            Ok(envelope) => {
                tracing::info!(
                    command = command.kind_label(),
                    owner = command.owner(),
                    repo = command.repo(),
                    "command completed"
                );
                envelope
            }
            Err(failure) => {
                tracing::warn!(
                    command = command.kind_label(),
                    owner = command.owner(),
                    repo = command.repo(),
                    step = ?failure.step,
                    timeout = failure.error.is_timeout(),
                    error = %failure.error,
                    "command failed"
                );
                failure_envelope(&failure)
            }
        }
    }

    async fn run_steps(&self, command: &Command) -> Result<ResponseEnvelope, StepFailure> {
        match command {
            Command::ListWorkflows { owner, repo } => self.list_workflows(owner, repo).await,
            Command::RunWorkflow {
                owner,
                repo,
                workflow,
                git_ref,
            } => self.run_workflow(owner, repo, workflow, git_ref).await,
            Command::Status {
                owner,
                repo,
                workflow,
            } => self.status(owner, repo, workflow.as_ref()).await,
            Command::Logs {
                owner,
                repo,
                run_id,
            } => self.logs(owner, repo, *run_id).await,
            Command::ShortcutRun {
                owner,
                repo,
                shortcut,
            } => self.shortcut_run(owner, repo, *shortcut).await,
        }
    }

    async fn list_workflows(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<ResponseEnvelope, StepFailure> {
        let workflows = self
            .provider
            .list_workflows(owner, repo)
            .await
            .at_step(ExecutionStep::ListWorkflows)?;
        let mut envelope =
            ResponseEnvelope::new(EnvelopeKind::Success, format!("Workflows in {owner}/{repo}"));
        if workflows.is_empty() {
            envelope = envelope.with_description("No workflows found.");
        }
        for workflow in &workflows {
            envelope = envelope.with_line(EnvelopeLine::new(
                workflow.name.as_str(),
                format!("ID: {}\nState: {}", workflow.id, workflow.state),
            ));
        }
        Ok(envelope)
    }

    async fn resolve(
        &self,
        owner: &str,
        repo: &str,
        workflow: &WorkflowRef,
    ) -> Result<WorkflowSummary, StepFailure> {
        resolve_workflow(self.provider.as_ref(), owner, repo, workflow)
            .await
            .at_step(ExecutionStep::ResolveWorkflow)
    }

    async fn dispatch(
        &self,
        owner: &str,
        repo: &str,
        workflow: &WorkflowSummary,
        git_ref: &str,
    ) -> Result<(), StepFailure> {
        self.provider
            .dispatch_workflow(owner, repo, workflow.id, git_ref)
            .await
            .at_step(ExecutionStep::Dispatch)?;
        tracing::info!(
            owner,
            repo,
            workflow_id = workflow.id,
            git_ref,
            "workflow dispatched"
        );
        Ok(())
    }

    async fn run_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow: &WorkflowRef,
        git_ref: &str,
    ) -> Result<ResponseEnvelope, StepFailure> {
        let git_ref = if git_ref.trim().is_empty() {
            DEFAULT_GIT_REF
        } else {
            git_ref
        };
        let resolved = self.resolve(owner, repo, workflow).await?;
        self.dispatch(owner, repo, &resolved, git_ref).await?;
        let target = match workflow {
            WorkflowRef::ById(id) => id.to_string(),
            WorkflowRef::ByNameFragment(_) => format!("'{}'", resolved.name),
        };
        Ok(
            ResponseEnvelope::new(EnvelopeKind::Success, "Workflow Started").with_description(
                format!("Workflow {target} in {owner}/{repo} has been triggered on `{git_ref}`"),
            ),
        )
    }

    async fn status(
        &self,
        owner: &str,
        repo: &str,
        workflow: Option<&WorkflowRef>,
    ) -> Result<ResponseEnvelope, StepFailure> {
        let workflow_id = match workflow {
            None => None,
            Some(WorkflowRef::ById(id)) => Some(*id),
            Some(reference) => Some(self.resolve(owner, repo, reference).await?.id),
        };
        let runs = self
            .provider
            .list_runs(owner, repo, workflow_id)
            .await
            .at_step(ExecutionStep::ListRuns)?;
        let mut envelope = ResponseEnvelope::new(
            EnvelopeKind::Info,
            format!("Recent Workflow Runs - {owner}/{repo}"),
        );
        if runs.is_empty() {
            envelope = envelope.with_description("No workflow runs found.");
        }
        for run in runs.iter().take(STATUS_RUN_LIMIT) {
            envelope = envelope.with_line(run_line(run));
        }
        Ok(envelope)
    }

    async fn logs(
        &self,
        owner: &str,
        repo: &str,
        run_id: i64,
    ) -> Result<ResponseEnvelope, StepFailure> {
        // The archive location is fetched to confirm the run exists; its content is not rendered.
        let _archive_url = self
            .provider
            .workflow_run_logs_url(owner, repo, run_id, LOG_ARCHIVE_ATTEMPT)
            .await
            .at_step(ExecutionStep::FetchLogs)?;
        Ok(ResponseEnvelope::new(EnvelopeKind::Info, "Workflow Logs")
            .with_description(format!("Logs for run {run_id} in {owner}/{repo}")))
    }

    async fn shortcut_run(
        &self,
        owner: &str,
        repo: &str,
        shortcut: ShortcutCommand,
    ) -> Result<ResponseEnvelope, StepFailure> {
        let resolved = self.resolve(owner, repo, &shortcut.workflow_ref()).await?;
        self.dispatch(owner, repo, &resolved, DEFAULT_GIT_REF).await?;
        Ok(ResponseEnvelope::new(
            EnvelopeKind::Success,
            format!("Workflow Started: {}", resolved.name),
        )
        .with_description(format!(
            "Workflow '{}' in {owner}/{repo} has been triggered",
            resolved.name
        )))
    }
}

fn run_line(run: &RunSummary) -> EnvelopeLine {
    let classification = RunClassification::classify(&run.status, run.conclusion.as_deref());
    let heading = if run.name.trim().is_empty() {
        format!("Run {}", run.id)
    } else {
        run.name.clone()
    };
    EnvelopeLine::new(
        heading,
        format!(
            "Status: {}\nRun ID: {}\nCreated: {}",
            run.status,
            run.id,
            run.created_at.format(RUN_TIMESTAMP_FORMAT)
        ),
    )
    .classified(classification)
}

fn failure_envelope(failure: &StepFailure) -> ResponseEnvelope {
    let message = match (&failure.error, failure.step) {
        (DispatchError::Usage(_), _)
        | (DispatchError::WorkflowNotFound { .. }, _)
        | (_, None) => failure.error.to_string(),
        (error, Some(step)) => format!("{}: {error}", step.failure_label()),
    };
    ResponseEnvelope::error("Error", message)
}
