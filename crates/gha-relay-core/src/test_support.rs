//! In-memory provider and sink fakes shared by the crate's tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::ci_provider::{CiProvider, RunSummary, WorkflowSummary};
use crate::dispatch::{InteractionResponder, ResponseSink};
use crate::envelope::ResponseEnvelope;
use crate::error::{CiProviderError, TransportError};

pub(crate) fn workflow(id: i64, name: &str) -> WorkflowSummary {
    WorkflowSummary {
        id,
        name: name.to_string(),
        state: "active".to_string(),
    }
}

pub(crate) fn run(id: i64, name: &str, status: &str, conclusion: Option<&str>) -> RunSummary {
    RunSummary {
        id,
        name: name.to_string(),
        status: status.to_string(),
        conclusion: conclusion.map(str::to_string),
        created_at: Utc
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp"),
    }
}

#[derive(Default)]
struct FakeFailures {
    list_workflows: Option<CiProviderError>,
    list_runs: Option<CiProviderError>,
    dispatch: Option<CiProviderError>,
    logs: Option<CiProviderError>,
}

#[derive(Default)]
pub(crate) struct FakeProvider {
    workflows: Vec<WorkflowSummary>,
    runs: Vec<RunSummary>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<FakeFailures>,
}

impl FakeProvider {
    pub(crate) fn with_workflows(workflows: Vec<WorkflowSummary>) -> Self {
        Self {
            workflows,
            ..Self::default()
        }
    }

    pub(crate) fn with_runs(mut self, runs: Vec<RunSummary>) -> Self {
        self.runs = runs;
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn fail_list_workflows(&self, error: CiProviderError) {
        self.failures.lock().expect("failures lock").list_workflows = Some(error);
    }

    pub(crate) fn fail_list_runs(&self, error: CiProviderError) {
        self.failures.lock().expect("failures lock").list_runs = Some(error);
    }

    pub(crate) fn fail_dispatch(&self, error: CiProviderError) {
        self.failures.lock().expect("failures lock").dispatch = Some(error);
    }

    pub(crate) fn fail_logs(&self, error: CiProviderError) {
        self.failures.lock().expect("failures lock").logs = Some(error);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn dispatch_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with("dispatch "))
            .collect()
    }

    async fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl CiProvider for FakeProvider {
    async fn list_workflows(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<WorkflowSummary>, CiProviderError> {
        self.record(format!("list_workflows {owner}/{repo}")).await;
        if let Some(error) = self.failures.lock().expect("failures lock").list_workflows.clone() {
            return Err(error);
        }
        Ok(self.workflows.clone())
    }

    async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: Option<i64>,
    ) -> Result<Vec<RunSummary>, CiProviderError> {
        let scope = workflow_id
            .map(|id| format!(" workflow={id}"))
            .unwrap_or_default();
        self.record(format!("list_runs {owner}/{repo}{scope}")).await;
        if let Some(error) = self.failures.lock().expect("failures lock").list_runs.clone() {
            return Err(error);
        }
        Ok(self.runs.clone())
    }

    async fn dispatch_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: i64,
        git_ref: &str,
    ) -> Result<(), CiProviderError> {
        self.record(format!("dispatch {owner}/{repo} {workflow_id} {git_ref}"))
            .await;
        if let Some(error) = self.failures.lock().expect("failures lock").dispatch.clone() {
            return Err(error);
        }
        Ok(())
    }

    async fn workflow_run_logs_url(
        &self,
        owner: &str,
        repo: &str,
        run_id: i64,
        attempt: u32,
    ) -> Result<String, CiProviderError> {
        self.record(format!("logs {owner}/{repo} {run_id} attempt={attempt}"))
            .await;
        if let Some(error) = self.failures.lock().expect("failures lock").logs.clone() {
            return Err(error);
        }
        Ok(format!(
            "https://logs.example.test/{owner}/{repo}/{run_id}/{attempt}.zip"
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SinkEvent {
    Acknowledged(String),
    Rejected(ResponseEnvelope),
    Delivered(ResponseEnvelope),
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
    fail_with: Option<String>,
}

impl RecordingSink {
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub(crate) fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().expect("sink lock").clone()
    }

    pub(crate) fn delivered(&self) -> Vec<ResponseEnvelope> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Delivered(envelope) => Some(envelope),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: SinkEvent) -> Result<(), TransportError> {
        if let Some(message) = &self.fail_with {
            return Err(TransportError::new(message.clone()));
        }
        self.events.lock().expect("sink lock").push(event);
        Ok(())
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn deliver(&self, envelope: &ResponseEnvelope) -> Result<(), TransportError> {
        self.record(SinkEvent::Delivered(envelope.clone()))
    }
}

#[async_trait]
impl InteractionResponder for RecordingSink {
    async fn acknowledge(&self, text: &str) -> Result<(), TransportError> {
        self.record(SinkEvent::Acknowledged(text.to_string()))
    }

    async fn reject(&self, envelope: &ResponseEnvelope) -> Result<(), TransportError> {
        self.record(SinkEvent::Rejected(envelope.clone()))
    }
}
