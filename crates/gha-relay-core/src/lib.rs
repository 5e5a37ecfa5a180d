//! Command dispatch and workflow resolution engine for the gha-relay bot.
//!
//! Normalizes text and slash-command input into one [`Command`] type, resolves
//! workflow references against the CI provider, sequences provider calls, and
//! produces a surface-independent [`ResponseEnvelope`].

pub mod ci_provider;
pub mod command;
pub mod command_parser;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod render;
pub mod workflow_resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use ci_provider::{CiProvider, RunSummary, WorkflowSummary};
pub use command::{Command, ShortcutCommand, WorkflowRef, DEFAULT_GIT_REF};
pub use command_parser::{
    help_envelope, parse_structured_command, parse_text_command, ParsedTextCommand,
    DEFAULT_COMMAND_PREFIX,
};
pub use dispatch::{
    deliver_or_log, usage_envelope, CommandDispatcher, InteractionResponder, ResponseSink,
};
pub use envelope::{EnvelopeKind, EnvelopeLine, ResponseEnvelope, RunClassification};
pub use error::{CiProviderError, DispatchError, TransportError, UsageError};
pub use executor::{OperationExecutor, DEFAULT_COMMAND_TIMEOUT, STATUS_RUN_LIMIT};
pub use render::{render_plain_text, render_shortcut_acknowledgement};
pub use workflow_resolver::resolve_workflow;
