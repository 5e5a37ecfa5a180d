//! Surface-independent response representation produced once per command.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Coarse outcome of one workflow run, derived from `(status, conclusion)`.
pub enum RunClassification {
    Pending,
    Success,
    Failure,
}

impl RunClassification {
    pub fn classify(status: &str, conclusion: Option<&str>) -> Self {
        if status != "completed" {
            return Self::Pending;
        }
        match conclusion {
            Some("success") => Self::Success,
            _ => Self::Failure,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Pending => "🟡",
            Self::Success => "🟢",
            Self::Failure => "🔴",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeLine {
    pub heading: String,
    pub detail: String,
    pub classification: Option<RunClassification>,
}

impl EnvelopeLine {
    pub fn new(heading: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            detail: detail.into(),
            classification: None,
        }
    }

    pub fn classified(mut self, classification: RunClassification) -> Self {
        self.classification = Some(classification);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub kind: EnvelopeKind,
    pub title: String,
    pub description: Option<String>,
    pub lines: Vec<EnvelopeLine>,
}

impl ResponseEnvelope {
    pub fn new(kind: EnvelopeKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
            lines: Vec::new(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(EnvelopeKind::Error, title).with_description(message)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_line(mut self, line: EnvelopeLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == EnvelopeKind::Error
    }
}
