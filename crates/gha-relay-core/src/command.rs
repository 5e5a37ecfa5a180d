//! Canonical command model shared by the text and slash-command surfaces.

use std::fmt;

pub const DEFAULT_GIT_REF: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Target workflow, either a provider id or a case-insensitive name fragment.
pub enum WorkflowRef {
    ById(i64),
    ByNameFragment(String),
}

impl fmt::Display for WorkflowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "{id}"),
            Self::ByNameFragment(fragment) => write!(f, "'{fragment}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Slash commands whose target workflow is implied by their own name.
pub enum ShortcutCommand {
    Build,
    BuildWindows,
    BuildMac,
    BuildDrive,
    CodeCheck,
}

impl ShortcutCommand {
    pub const ALL: [ShortcutCommand; 5] = [
        Self::Build,
        Self::BuildWindows,
        Self::BuildMac,
        Self::BuildDrive,
        Self::CodeCheck,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::BuildWindows => "build-win",
            Self::BuildMac => "build-mac",
            Self::BuildDrive => "build-drive",
            Self::CodeCheck => "code-check",
        }
    }

    /// Name fragment handed to the workflow resolver.
    pub fn workflow_fragment(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::BuildWindows => "build-windows",
            Self::BuildMac => "build-macos",
            Self::BuildDrive => "build-drive",
            Self::CodeCheck => "code-check",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Build => "Run all build workflows",
            Self::BuildWindows => "Run Windows build workflow",
            Self::BuildMac => "Run macOS build workflow",
            Self::BuildDrive => "Run AssetImporter build workflow",
            Self::CodeCheck => "Run static code analysis workflow",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|shortcut| shortcut.name() == name.trim())
    }

    pub fn workflow_ref(self) -> WorkflowRef {
        WorkflowRef::ByNameFragment(self.workflow_fragment().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One normalized operation. `owner` and `repo` are never empty.
pub enum Command {
    ListWorkflows {
        owner: String,
        repo: String,
    },
    RunWorkflow {
        owner: String,
        repo: String,
        workflow: WorkflowRef,
        git_ref: String,
    },
    Status {
        owner: String,
        repo: String,
        workflow: Option<WorkflowRef>,
    },
    Logs {
        owner: String,
        repo: String,
        run_id: i64,
    },
    ShortcutRun {
        owner: String,
        repo: String,
        shortcut: ShortcutCommand,
    },
}

impl Command {
    pub fn owner(&self) -> &str {
        match self {
            Self::ListWorkflows { owner, .. }
            | Self::RunWorkflow { owner, .. }
            | Self::Status { owner, .. }
            | Self::Logs { owner, .. }
            | Self::ShortcutRun { owner, .. } => owner,
        }
    }

    pub fn repo(&self) -> &str {
        match self {
            Self::ListWorkflows { repo, .. }
            | Self::RunWorkflow { repo, .. }
            | Self::Status { repo, .. }
            | Self::Logs { repo, .. }
            | Self::ShortcutRun { repo, .. } => repo,
        }
    }

    /// Stable label used in log fields.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::ListWorkflows { .. } => "workflows",
            Self::RunWorkflow { .. } => "run",
            Self::Status { .. } => "status",
            Self::Logs { .. } => "logs",
            Self::ShortcutRun { shortcut, .. } => shortcut.name(),
        }
    }
}
