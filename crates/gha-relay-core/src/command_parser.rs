//! Normalizes prefixed text messages and slash-command interactions into [`Command`]s.

use std::collections::HashMap;

use crate::command::{Command, ShortcutCommand, WorkflowRef, DEFAULT_GIT_REF};
use crate::envelope::{EnvelopeKind, EnvelopeLine, ResponseEnvelope};
use crate::error::UsageError;

pub const DEFAULT_COMMAND_PREFIX: &str = "!gh";
pub const HELP_TITLE: &str = "GitHub Actions Discord Bot Help";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of parsing a message that carried the trigger prefix.
pub enum ParsedTextCommand {
    Command(Command),
    Help,
    Invalid(UsageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextCommandEnvelope<'a> {
    command: &'a str,
    args: Vec<&'a str>,
}

fn parse_text_command_envelope<'a>(body: &'a str, prefix: &str) -> Option<TextCommandEnvelope<'a>> {
    let mut pieces = body.split_whitespace();
    if pieces.next()? != prefix {
        return None;
    }
    let command = pieces.next().unwrap_or_default();
    Some(TextCommandEnvelope {
        command,
        args: pieces.collect(),
    })
}

pub fn text_command_usage(prefix: &str, command: &str) -> String {
    match command {
        "workflows" => format!("Usage: `{prefix} workflows <owner> <repo>`"),
        "run" => format!("Usage: `{prefix} run <owner> <repo> <workflow_id> [ref]`"),
        "status" => format!("Usage: `{prefix} status <owner> <repo> [workflow_id]`"),
        "logs" => format!("Usage: `{prefix} logs <owner> <repo> <run_id>`"),
        _ => help_text_commands(prefix),
    }
}

fn help_text_commands(prefix: &str) -> String {
    [
        format!("`{prefix} workflows <owner> <repo>` - List workflows"),
        format!("`{prefix} run <owner> <repo> <workflow_id> [ref]` - Run workflow"),
        format!("`{prefix} status <owner> <repo> [workflow_id]` - Get workflow status"),
        format!("`{prefix} logs <owner> <repo> <run_id>` - Get workflow logs"),
    ]
    .join("\n")
}

fn help_slash_commands() -> String {
    ShortcutCommand::ALL
        .iter()
        .map(|shortcut| format!("`/{}` - {}", shortcut.name(), shortcut.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Info envelope listing both command surfaces.
pub fn help_envelope(prefix: &str) -> ResponseEnvelope {
    ResponseEnvelope::new(EnvelopeKind::Info, HELP_TITLE)
        .with_line(EnvelopeLine::new("Text Commands", help_text_commands(prefix)))
        .with_line(EnvelopeLine::new("Slash Commands", help_slash_commands()))
}

/// Parses a chat message. Returns `None` when the first token is not `prefix`.
pub fn parse_text_command(body: &str, prefix: &str) -> Option<ParsedTextCommand> {
    let envelope = parse_text_command_envelope(body, prefix)?;
    let parsed = match envelope.command {
        "" => ParsedTextCommand::Help,
        "workflows" | "run" | "status" | "logs" => {
            match parse_sub_command(prefix, envelope.command, &envelope.args) {
                Ok(command) => ParsedTextCommand::Command(command),
                Err(error) => ParsedTextCommand::Invalid(error),
            }
        }
        _ => ParsedTextCommand::Help,
    };
    Some(parsed)
}

fn parse_sub_command(prefix: &str, command: &str, args: &[&str]) -> Result<Command, UsageError> {
    let usage = || UsageError::new(text_command_usage(prefix, command));
    let (owner, repo) = match args {
        [owner, repo, ..] => (owner.to_string(), repo.to_string()),
        _ => return Err(usage()),
    };
    let rest = &args[2..];
    match command {
        "workflows" => Ok(Command::ListWorkflows { owner, repo }),
        "run" => {
            let raw_id = rest.first().ok_or_else(usage)?;
            let workflow_id = parse_positive_id(prefix, command, "workflow ID", raw_id)?;
            let git_ref = rest
                .get(1)
                .map(|value| value.to_string())
                .unwrap_or_else(|| DEFAULT_GIT_REF.to_string());
            Ok(Command::RunWorkflow {
                owner,
                repo,
                workflow: WorkflowRef::ById(workflow_id),
                git_ref,
            })
        }
        "status" => {
            let workflow = rest
                .first()
                .map(|raw_id| parse_positive_id(prefix, command, "workflow ID", raw_id))
                .transpose()?
                .map(WorkflowRef::ById);
            Ok(Command::Status {
                owner,
                repo,
                workflow,
            })
        }
        "logs" => {
            let raw_id = rest.first().ok_or_else(usage)?;
            let run_id = parse_positive_id(prefix, command, "run ID", raw_id)?;
            Ok(Command::Logs {
                owner,
                repo,
                run_id,
            })
        }
        _ => Err(UsageError::new(help_text_commands(prefix))),
    }
}

fn parse_positive_id(
    prefix: &str,
    command: &str,
    label: &str,
    raw: &str,
) -> Result<i64, UsageError> {
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(UsageError::new(format!(
            "Invalid {label} `{raw}`.\n{}",
            text_command_usage(prefix, command)
        ))),
    }
}

fn structured_command_usage(name: &str) -> String {
    format!("Usage: `/{name} owner:<owner> repo:<repo>`")
}

/// Parses a slash-command interaction. `owner` and `repo` must be present and non-empty.
pub fn parse_structured_command(
    name: &str,
    arguments: &HashMap<String, String>,
) -> Result<Command, UsageError> {
    let shortcut = ShortcutCommand::from_name(name).ok_or_else(|| {
        UsageError::new(format!(
            "Unknown command `/{}`.\n{}",
            name.trim(),
            help_slash_commands()
        ))
    })?;
    let required = |key: &str| {
        arguments
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| UsageError::new(structured_command_usage(shortcut.name())))
    };
    Ok(Command::ShortcutRun {
        owner: required("owner")?,
        repo: required("repo")?,
        shortcut,
    })
}
