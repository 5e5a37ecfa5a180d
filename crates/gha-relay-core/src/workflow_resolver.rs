//! Resolves a [`WorkflowRef`] against the provider's workflow list.
//!
//! Fragments use first-match semantics: the first workflow, in provider order,
//! whose lowercased name contains the lowercased fragment wins. An ambiguous
//! fragment such as `build` silently picks whichever matching workflow the
//! provider lists first, so shortcut fragments must stay distinctive.

use crate::ci_provider::{CiProvider, WorkflowSummary};
use crate::command::WorkflowRef;
use crate::error::DispatchError;

/// Returns the first workflow whose name contains `fragment`, ignoring case.
pub fn match_workflow_fragment<'a>(
    workflows: &'a [WorkflowSummary],
    fragment: &str,
) -> Option<&'a WorkflowSummary> {
    let needle = fragment.trim().to_lowercase();
    workflows
        .iter()
        .find(|workflow| workflow.name.to_lowercase().contains(needle.as_str()))
}

/// Resolves `workflow` for `owner/repo`.
///
/// `ById` performs no provider call; the id is trusted until the dispatch call
/// rejects it. `ByNameFragment` performs exactly one list call.
pub async fn resolve_workflow(
    provider: &dyn CiProvider,
    owner: &str,
    repo: &str,
    workflow: &WorkflowRef,
) -> Result<WorkflowSummary, DispatchError> {
    match workflow {
        WorkflowRef::ById(id) => Ok(WorkflowSummary {
            id: *id,
            name: format!("#{id}"),
            state: "unknown".to_string(),
        }),
        WorkflowRef::ByNameFragment(fragment) => {
            let workflows = provider.list_workflows(owner, repo).await?;
            let matched = match_workflow_fragment(&workflows, fragment).cloned();
            tracing::debug!(
                owner,
                repo,
                fragment = fragment.as_str(),
                candidates = workflows.len(),
                matched = ?matched.as_ref().map(|workflow| workflow.id),
                "workflow fragment resolved"
            );
            matched.ok_or_else(|| DispatchError::WorkflowNotFound {
                fragment: fragment.clone(),
            })
        }
    }
}
