//! [`ResponseSink`] implementations for Discord channels and interactions.
//!
//! Both surfaces send errors as plain text and everything else as an embed.

use std::sync::Arc;

use async_trait::async_trait;
use gha_relay_core::{InteractionResponder, ResponseEnvelope, ResponseSink, TransportError};
use serenity::all::{
    ChannelId, CommandInteraction, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, Http,
};

use crate::discord_render::{render_embed, reply_parts, ReplyParts};

fn discord_transport_error(operation: &str, error: serenity::Error) -> TransportError {
    TransportError::new(format!("discord {operation} failed: {error}"))
}

pub(crate) fn channel_message(envelope: &ResponseEnvelope) -> CreateMessage {
    match reply_parts(envelope) {
        ReplyParts::Text(content) => CreateMessage::new().content(content),
        ReplyParts::Embed(parts) => CreateMessage::new().embed(render_embed(parts)),
    }
}

pub(crate) fn followup_message(envelope: &ResponseEnvelope) -> CreateInteractionResponseFollowup {
    match reply_parts(envelope) {
        ReplyParts::Text(content) => CreateInteractionResponseFollowup::new().content(content),
        ReplyParts::Embed(parts) => {
            CreateInteractionResponseFollowup::new().embed(render_embed(parts))
        }
    }
}

pub(crate) fn rejection_message(envelope: &ResponseEnvelope) -> CreateInteractionResponseMessage {
    let message = match reply_parts(envelope) {
        ReplyParts::Text(content) => CreateInteractionResponseMessage::new().content(content),
        ReplyParts::Embed(parts) => {
            CreateInteractionResponseMessage::new().embed(render_embed(parts))
        }
    };
    message.ephemeral(true)
}

/// Posts envelopes into the channel a text command arrived on.
pub struct ChannelMessageSink {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl ChannelMessageSink {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl ResponseSink for ChannelMessageSink {
    async fn deliver(&self, envelope: &ResponseEnvelope) -> Result<(), TransportError> {
        self.channel_id
            .send_message(&self.http, channel_message(envelope))
            .await
            .map_err(|error| discord_transport_error("channel message send", error))?;
        Ok(())
    }
}

/// Answers one slash-command interaction: the initial response, then follow-ups.
pub struct InteractionReplySink {
    http: Arc<Http>,
    interaction: CommandInteraction,
}

impl InteractionReplySink {
    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> Self {
        Self { http, interaction }
    }

    async fn respond(&self, response: CreateInteractionResponse) -> Result<(), TransportError> {
        self.interaction
            .create_response(&self.http, response)
            .await
            .map_err(|error| discord_transport_error("interaction response", error))
    }
}

#[async_trait]
impl ResponseSink for InteractionReplySink {
    async fn deliver(&self, envelope: &ResponseEnvelope) -> Result<(), TransportError> {
        self.interaction
            .create_followup(&self.http, followup_message(envelope))
            .await
            .map_err(|error| discord_transport_error("interaction follow-up", error))?;
        Ok(())
    }
}

#[async_trait]
impl InteractionResponder for InteractionReplySink {
    async fn acknowledge(&self, text: &str) -> Result<(), TransportError> {
        self.respond(CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(text),
        ))
        .await
    }

    async fn reject(&self, envelope: &ResponseEnvelope) -> Result<(), TransportError> {
        self.respond(CreateInteractionResponse::Message(rejection_message(envelope)))
            .await
    }
}
