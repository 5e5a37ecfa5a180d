//! Envelope to embed rendering. Colours and run markers are presentation only.

use gha_relay_core::{render_plain_text, EnvelopeKind, ResponseEnvelope};
use serenity::all::CreateEmbed;

pub const SUCCESS_COLOUR: u32 = 0x00ff00;
pub const INFO_COLOUR: u32 = 0x0099ff;
pub const ERROR_COLOUR: u32 = 0xff0000;

const EMBED_TITLE_MAX_CHARS: usize = 256;
const EMBED_DESCRIPTION_MAX_CHARS: usize = 4_096;
const EMBED_FIELD_NAME_MAX_CHARS: usize = 256;
const EMBED_FIELD_VALUE_MAX_CHARS: usize = 1_024;
const EMBED_MAX_FIELDS: usize = 25;
const MESSAGE_CONTENT_MAX_CHARS: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Embed content before it is handed to the serenity builder.
pub struct EmbedParts {
    pub title: String,
    pub description: Option<String>,
    pub colour: u32,
    pub fields: Vec<(String, String, bool)>,
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}

pub fn embed_parts(envelope: &ResponseEnvelope) -> EmbedParts {
    let colour = match envelope.kind {
        EnvelopeKind::Success => SUCCESS_COLOUR,
        EnvelopeKind::Info => INFO_COLOUR,
        EnvelopeKind::Error => ERROR_COLOUR,
    };
    let fields = envelope
        .lines
        .iter()
        .take(EMBED_MAX_FIELDS)
        .map(|line| {
            let name = match line.classification {
                Some(classification) => format!("{} {}", classification.marker(), line.heading),
                None => line.heading.clone(),
            };
            (
                truncate_chars(&name, EMBED_FIELD_NAME_MAX_CHARS),
                truncate_chars(&line.detail, EMBED_FIELD_VALUE_MAX_CHARS),
                true,
            )
        })
        .collect();
    EmbedParts {
        title: truncate_chars(&envelope.title, EMBED_TITLE_MAX_CHARS),
        description: envelope
            .description
            .as_deref()
            .map(|description| truncate_chars(description, EMBED_DESCRIPTION_MAX_CHARS)),
        colour,
        fields,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Shape of one Discord reply. Errors and usage hints go out as plain text.
pub enum ReplyParts {
    Text(String),
    Embed(EmbedParts),
}

pub fn reply_parts(envelope: &ResponseEnvelope) -> ReplyParts {
    if envelope.is_error() {
        ReplyParts::Text(truncate_chars(
            &render_plain_text(envelope),
            MESSAGE_CONTENT_MAX_CHARS,
        ))
    } else {
        ReplyParts::Embed(embed_parts(envelope))
    }
}

pub(crate) fn render_embed(parts: EmbedParts) -> CreateEmbed {
    let mut embed = CreateEmbed::new().title(parts.title).colour(parts.colour);
    if let Some(description) = parts.description {
        embed = embed.description(description);
    }
    embed.fields(parts.fields)
}
