//! Entry points that take one inbound event from a chat surface through
//! normalization, execution, and delivery.
//!
//! Every event is handled independently; the dispatcher holds only read-only
//! shared handles and is cheap to clone into per-event tasks.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::command::Command;
use crate::command_parser::{
    help_envelope, parse_structured_command, parse_text_command, ParsedTextCommand,
};
use crate::envelope::ResponseEnvelope;
use crate::error::{TransportError, UsageError};
use crate::executor::OperationExecutor;
use crate::render::render_shortcut_acknowledgement;

#[async_trait]
/// Delivers a finished envelope to the surface the command came from.
pub trait ResponseSink: Send + Sync {
    async fn deliver(&self, envelope: &ResponseEnvelope) -> Result<(), TransportError>;
}

#[async_trait]
/// Reply channel of a structured interaction.
///
/// The interaction is answered once, either with [`reject`](Self::reject) for
/// malformed input or with [`acknowledge`](Self::acknowledge) before execution.
/// The execution result then goes out through [`ResponseSink::deliver`].
pub trait InteractionResponder: ResponseSink {
    async fn acknowledge(&self, text: &str) -> Result<(), TransportError>;
    async fn reject(&self, envelope: &ResponseEnvelope) -> Result<(), TransportError>;
}

#[derive(Clone)]
pub struct CommandDispatcher {
    executor: OperationExecutor,
    prefix: String,
}

impl CommandDispatcher {
    pub fn new(executor: OperationExecutor, prefix: impl Into<String>) -> Self {
        Self {
            executor,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Produces the response for a text message, or `None` when it is not addressed to the bot.
    pub async fn envelope_for_text(&self, body: &str) -> Option<ResponseEnvelope> {
        let parsed = parse_text_command(body, &self.prefix)?;
        let envelope = match parsed {
            ParsedTextCommand::Command(command) => self.executor.execute(&command).await,
            ParsedTextCommand::Help => help_envelope(&self.prefix),
            ParsedTextCommand::Invalid(error) => usage_envelope(&error),
        };
        Some(envelope)
    }

    /// Handles one text message. Returns `false` when the message was not a command.
    pub async fn handle_text(&self, body: &str, sink: &dyn ResponseSink) -> bool {
        let Some(envelope) = self.envelope_for_text(body).await else {
            return false;
        };
        deliver_or_log(sink, &envelope).await;
        true
    }

    /// Handles one slash-command interaction: reject or acknowledge, execute, follow up.
    pub async fn handle_structured(
        &self,
        name: &str,
        arguments: &HashMap<String, String>,
        responder: &dyn InteractionResponder,
    ) {
        let command = match parse_structured_command(name, arguments) {
            Ok(command) => command,
            Err(error) => {
                if let Err(error) = responder.reject(&usage_envelope(&error)).await {
                    tracing::warn!(command = name, error = %error, "failed to reject interaction");
                }
                return;
            }
        };
        let Command::ShortcutRun {
            owner,
            repo,
            shortcut,
        } = &command
        else {
            return;
        };

        let acknowledgement = render_shortcut_acknowledgement(*shortcut, owner, repo);
        if let Err(error) = responder.acknowledge(&acknowledgement).await {
            // Follow-ups are rejected for an interaction that was never answered.
            tracing::warn!(
                command = shortcut.name(),
                owner = owner.as_str(),
                repo = repo.as_str(),
                error = %error,
                "failed to acknowledge interaction"
            );
            return;
        }

        let envelope = self.executor.execute(&command).await;
        deliver_or_log(responder, &envelope).await;
    }
}

pub fn usage_envelope(error: &UsageError) -> ResponseEnvelope {
    ResponseEnvelope::error("Invalid command", error.expected_form.as_str())
}

/// Delivery failures cannot be reported to the user, so they are only logged.
pub async fn deliver_or_log<S>(sink: &S, envelope: &ResponseEnvelope)
where
    S: ResponseSink + ?Sized,
{
    if let Err(error) = sink.deliver(envelope).await {
        tracing::warn!(
            title = envelope.title.as_str(),
            kind = ?envelope.kind,
            error = %error,
            "response delivery failed"
        );
    }
}
