use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use gha_relay_core::{CiProvider, CiProviderError, RunSummary, WorkflowSummary};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::github_transport_helpers::{status_error, transport_error};

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const WORKFLOWS_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct GithubActionsConfig {
    pub api_base: String,
    pub token: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct WorkflowsPage {
    #[serde(default)]
    total_count: usize,
    workflows: Vec<WorkflowSummary>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunsPage {
    workflow_runs: Vec<RunSummary>,
}

#[derive(Clone)]
/// Single-attempt GitHub Actions client. Redirects are not followed so the
/// log archive location can be read from the `Location` header.
pub struct GithubActionsClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubActionsClient {
    pub fn new(config: GithubActionsConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("gha-relay"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", config.token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .context("invalid github authorization header")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("failed to create github actions client")?;
        Ok(Self {
            http,
            api_base: config.api_base.trim().trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, owner: &str, repo: &str, tail: &str) -> String {
        format!("{}/repos/{owner}/{repo}/actions/{tail}", self.api_base)
    }

    async fn send(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
        resource: impl FnOnce() -> String,
    ) -> Result<reqwest::Response, CiProviderError> {
        let response = request
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))?;
        let status = response.status();
        if status.is_success() || status.is_redirection() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(operation, status = status.as_u16(), "github api request rejected");
        Err(status_error(operation, resource, status.as_u16(), &body))
    }

    async fn request_json<T>(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
        resource: impl FnOnce() -> String,
    ) -> Result<T, CiProviderError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(operation, request, resource).await?;
        response.json::<T>().await.map_err(|error| {
            if error.is_timeout() {
                transport_error(operation, &error)
            } else {
                CiProviderError::request(format!("failed to decode github {operation}: {error}"))
            }
        })
    }
}

#[async_trait]
impl CiProvider for GithubActionsClient {
    async fn list_workflows(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<WorkflowSummary>, CiProviderError> {
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let request = self
                .http
                .get(self.repo_url(owner, repo, "workflows"))
                .query(&[
                    ("per_page", WORKFLOWS_PAGE_SIZE.to_string().as_str()),
                    ("page", page_value.as_str()),
                ]);
            let chunk: WorkflowsPage = self
                .request_json("list workflows", request, || {
                    format!("repository {owner}/{repo}")
                })
                .await?;
            let chunk_len = chunk.workflows.len();
            rows.extend(chunk.workflows);
            if chunk_len < WORKFLOWS_PAGE_SIZE || rows.len() >= chunk.total_count {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(rows)
    }

    async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: Option<i64>,
    ) -> Result<Vec<RunSummary>, CiProviderError> {
        let tail = match workflow_id {
            Some(id) => format!("workflows/{id}/runs"),
            None => "runs".to_string(),
        };
        let request = self.http.get(self.repo_url(owner, repo, &tail));
        let page: WorkflowRunsPage = self
            .request_json("list workflow runs", request, || match workflow_id {
                Some(id) => format!("workflow {id} in {owner}/{repo}"),
                None => format!("repository {owner}/{repo}"),
            })
            .await?;
        Ok(page.workflow_runs)
    }

    async fn dispatch_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: i64,
        git_ref: &str,
    ) -> Result<(), CiProviderError> {
        let request = self
            .http
            .post(self.repo_url(
                owner,
                repo,
                &format!("workflows/{workflow_id}/dispatches"),
            ))
            .json(&json!({ "ref": git_ref }));
        self.send("dispatch workflow", request, || {
            format!("workflow {workflow_id} in {owner}/{repo}")
        })
        .await?;
        Ok(())
    }

    async fn workflow_run_logs_url(
        &self,
        owner: &str,
        repo: &str,
        run_id: i64,
        attempt: u32,
    ) -> Result<String, CiProviderError> {
        let request = self.http.get(self.repo_url(
            owner,
            repo,
            &format!("runs/{run_id}/attempts/{attempt}/logs"),
        ));
        let response = self
            .send("download workflow run logs", request, || {
                format!("run {run_id} in {owner}/{repo}")
            })
            .await?;
        if !response.status().is_redirection() {
            return Ok(response.url().to_string());
        }
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                CiProviderError::request(
                    "github api download workflow run logs returned a redirect without a location",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use gha_relay_core::{CiProvider, CiProviderError};
    use httpmock::prelude::*;
    use serde_json::json;

    use super::{GithubActionsClient, GithubActionsConfig};

    fn test_client(base_url: &str) -> GithubActionsClient {
        GithubActionsClient::new(GithubActionsConfig {
            api_base: format!("{base_url}/"),
            token: "ghs-test".to_string(),
            request_timeout_ms: 2_000,
        })
        .expect("client")
    }

    #[tokio::test]
    async fn functional_list_workflows_decodes_summaries_in_provider_order() {
        let server = MockServer::start_async().await;
        let listed = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/engine/actions/workflows")
                .query_param("per_page", "100")
                .query_param("page", "1")
                .header("authorization", "Bearer ghs-test")
                .header("x-github-api-version", "2022-11-28");
            then.status(200).json_body(json!({
                "total_count": 2,
                "workflows": [
                    {"id": 11, "name": "Build Windows", "state": "active", "path": ".github/workflows/win.yml"},
                    {"id": 12, "name": "Code Check", "state": "disabled_manually", "path": ".github/workflows/check.yml"}
                ]
            }));
        });

        let workflows = test_client(&server.base_url())
            .list_workflows("acme", "engine")
            .await
            .expect("workflows");
        listed.assert_calls(1);
        assert_eq!(workflows.len(), 2);
        assert_eq!(workflows[0].id, 11);
        assert_eq!(workflows[0].name, "Build Windows");
        assert_eq!(workflows[1].state, "disabled_manually");
    }

    #[tokio::test]
    async fn integration_list_workflows_follows_pages_until_short_chunk() {
        let server = MockServer::start_async().await;
        let first_page = (1..=100)
            .map(|id| json!({"id": id, "name": format!("wf-{id}"), "state": "active"}))
            .collect::<Vec<_>>();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/engine/actions/workflows")
                .query_param("page", "1");
            then.status(200)
                .json_body(json!({"total_count": 101, "workflows": first_page.clone()}));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/engine/actions/workflows")
                .query_param("page", "2");
            then.status(200).json_body(json!({
                "total_count": 101,
                "workflows": [{"id": 101, "name": "wf-101", "state": "active"}]
            }));
        });

        let workflows = test_client(&server.base_url())
            .list_workflows("acme", "engine")
            .await
            .expect("workflows");
        first.assert_calls(1);
        second.assert_calls(1);
        assert_eq!(workflows.len(), 101);
        assert_eq!(workflows[100].name, "wf-101");
    }

    #[tokio::test]
    async fn functional_list_runs_scopes_to_workflow_and_tolerates_null_fields() {
        let server = MockServer::start_async().await;
        let scoped = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/engine/actions/workflows/11/runs");
            then.status(200).json_body(json!({
                "total_count": 2,
                "workflow_runs": [
                    {"id": 900, "name": "Build Windows", "status": "completed", "conclusion": "success", "created_at": "2026-03-01T10:20:30Z"},
                    {"id": 901, "name": null, "status": "queued", "conclusion": null, "created_at": "2026-03-01T11:00:00Z"}
                ]
            }));
        });

        let runs = test_client(&server.base_url())
            .list_runs("acme", "engine", Some(11))
            .await
            .expect("runs");
        scoped.assert_calls(1);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].conclusion.as_deref(), Some("success"));
        assert_eq!(
            runs[0].created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2026-03-01 10:20:30"
        );
        assert_eq!(runs[1].name, "");
        assert_eq!(runs[1].conclusion, None);
    }

    #[tokio::test]
    async fn functional_list_runs_without_workflow_uses_repository_endpoint() {
        let server = MockServer::start_async().await;
        let repo_runs = server.mock(|when, then| {
            when.method(GET).path("/repos/acme/engine/actions/runs");
            then.status(200)
                .json_body(json!({"total_count": 0, "workflow_runs": []}));
        });

        let runs = test_client(&server.base_url())
            .list_runs("acme", "engine", None)
            .await
            .expect("runs");
        repo_runs.assert_calls(1);
        assert!(runs.is_empty());
    }

    #[tokio::test]
    async fn functional_dispatch_workflow_posts_ref_once() {
        let server = MockServer::start_async().await;
        let dispatched = server.mock(|when, then| {
            when.method(POST)
                .path("/repos/acme/engine/actions/workflows/11/dispatches")
                .json_body(json!({"ref": "release"}));
            then.status(204);
        });

        test_client(&server.base_url())
            .dispatch_workflow("acme", "engine", 11, "release")
            .await
            .expect("dispatched");
        dispatched.assert_calls(1);
    }

    #[tokio::test]
    async fn regression_dispatch_unknown_workflow_maps_to_not_found_without_retry() {
        let server = MockServer::start_async().await;
        let rejected = server.mock(|when, then| {
            when.method(POST)
                .path("/repos/acme/engine/actions/workflows/404/dispatches");
            then.status(404).json_body(json!({"message": "Not Found"}));
        });

        let error = test_client(&server.base_url())
            .dispatch_workflow("acme", "engine", 404, "main")
            .await
            .expect_err("not found");
        rejected.assert_calls(1);
        assert_eq!(
            error,
            CiProviderError::NotFound {
                resource: "workflow 404 in acme/engine".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn regression_server_errors_surface_status_and_single_attempt() {
        let server = MockServer::start_async().await;
        let failing = server.mock(|when, then| {
            when.method(GET).path("/repos/acme/engine/actions/workflows");
            then.status(502).body("upstream unavailable");
        });

        let error = test_client(&server.base_url())
            .list_workflows("acme", "engine")
            .await
            .expect_err("server error");
        failing.assert_calls(1);
        assert_eq!(
            error,
            CiProviderError::request(
                "github api list workflows failed with status 502: upstream unavailable"
            )
        );
    }

    #[tokio::test]
    async fn functional_logs_url_reads_redirect_location_for_first_attempt() {
        let server = MockServer::start_async().await;
        let logs = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/engine/actions/runs/900/attempts/1/logs");
            then.status(302)
                .header("Location", "https://pipelines.example.test/logs/900.zip");
        });

        let url = test_client(&server.base_url())
            .workflow_run_logs_url("acme", "engine", 900, 1)
            .await
            .expect("logs url");
        logs.assert_calls(1);
        assert_eq!(url, "https://pipelines.example.test/logs/900.zip");
    }

    #[tokio::test]
    async fn regression_request_timeout_is_flagged() {
        let server = MockServer::start_async().await;
        let _slow = server.mock(|when, then| {
            when.method(GET).path("/repos/acme/engine/actions/runs");
            then.status(200)
                .delay(std::time::Duration::from_millis(500))
                .json_body(json!({"workflow_runs": []}));
        });
        let client = GithubActionsClient::new(GithubActionsConfig {
            api_base: server.base_url(),
            token: "ghs-test".to_string(),
            request_timeout_ms: 50,
        })
        .expect("client");

        let error = client
            .list_runs("acme", "engine", None)
            .await
            .expect_err("timeout");
        assert!(matches!(
            error,
            CiProviderError::Request { timeout: true, .. }
        ));
    }
}
