use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{expected_form}")]
/// Malformed command input; carries the usage text for the expected form.
pub struct UsageError {
    pub expected_form: String,
}

impl UsageError {
    pub fn new(expected_form: impl Into<String>) -> Self {
        Self {
            expected_form: expected_form.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure reported by a [`crate::CiProvider`] call.
pub enum CiProviderError {
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("{message}")]
    Request { message: String, timeout: bool },
}

impl CiProviderError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
            timeout: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
            timeout: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure of a single command's handling, converted to an error envelope by the executor.
pub enum DispatchError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error("Workflow '{fragment}' not found")]
    WorkflowNotFound { fragment: String },
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("{message}")]
    Provider { message: String, timeout: bool },
}

impl DispatchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Provider { timeout: true, .. })
    }
}

impl From<CiProviderError> for DispatchError {
    fn from(error: CiProviderError) -> Self {
        match error {
            CiProviderError::NotFound { resource } => Self::NotFound { resource },
            CiProviderError::Request { message, timeout } => Self::Provider { message, timeout },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to deliver response: {message}")]
/// The rendered response could not be delivered to the chat surface.
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
