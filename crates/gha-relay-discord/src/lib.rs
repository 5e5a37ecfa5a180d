//! Discord transport for gha-relay.
//!
//! Bridges serenity gateway events (prefixed messages and slash-command
//! interactions) into the core [`CommandDispatcher`] and renders envelopes as
//! embeds or plain text.
//!
//! [`CommandDispatcher`]: gha_relay_core::CommandDispatcher

mod discord_handler;
mod discord_render;
mod discord_sink;
mod slash_commands;

pub use discord_handler::{run_discord_relay, DiscordRelayConfig};
pub use discord_render::{embed_parts, reply_parts, EmbedParts, ReplyParts};
pub use discord_sink::{ChannelMessageSink, InteractionReplySink};
pub use slash_commands::{register_shortcut_commands, shortcut_command_definitions};
