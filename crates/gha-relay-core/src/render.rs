//! Plain-text rendering for surfaces without rich embeds.

use crate::command::ShortcutCommand;
use crate::envelope::{EnvelopeKind, ResponseEnvelope};

/// Renders an envelope as chat markdown.
///
/// Error envelopes render as their message alone; other kinds render a bold
/// title followed by the description and one block per line.
pub fn render_plain_text(envelope: &ResponseEnvelope) -> String {
    if envelope.kind == EnvelopeKind::Error {
        return envelope
            .description
            .clone()
            .unwrap_or_else(|| envelope.title.clone());
    }

    let mut blocks = vec![format!("**{}**", envelope.title)];
    if let Some(description) = envelope
        .description
        .as_deref()
        .filter(|value| !value.trim().is_empty())
    {
        blocks.push(description.to_string());
    }
    for line in &envelope.lines {
        let heading = match line.classification {
            Some(classification) => format!("{} **{}**", classification.marker(), line.heading),
            None => format!("**{}**", line.heading),
        };
        blocks.push(format!("{heading}\n{}", line.detail));
    }
    blocks.join("\n\n")
}

/// Immediate acknowledgement sent before a shortcut command is executed.
pub fn render_shortcut_acknowledgement(
    shortcut: ShortcutCommand,
    owner: &str,
    repo: &str,
) -> String {
    format!(
        "Starting {} workflow for {owner}/{repo}...",
        shortcut.workflow_fragment()
    )
}
