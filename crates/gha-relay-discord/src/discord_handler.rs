//! Gateway event handler and client bootstrap.

use anyhow::{Context as _, Result};
use gha_relay_core::CommandDispatcher;
use serenity::all::{
    CommandInteraction, Context, EventHandler, GatewayIntents, GuildId, Interaction, Message, Ready,
};
use serenity::async_trait;
use serenity::Client;

use crate::discord_sink::{ChannelMessageSink, InteractionReplySink};
use crate::slash_commands::{interaction_arguments, register_shortcut_commands};

#[derive(Debug, Clone)]
pub struct DiscordRelayConfig {
    pub token: String,
    /// Guild for slash-command registration; commands are registered globally when unset.
    pub guild_id: Option<u64>,
}

struct RelayHandler {
    dispatcher: CommandDispatcher,
    guild_id: Option<GuildId>,
}

impl RelayHandler {
    async fn handle_shortcut(&self, ctx: &Context, interaction: CommandInteraction) {
        let name = interaction.data.name.clone();
        let arguments = interaction_arguments(&interaction);
        let sink = InteractionReplySink::new(ctx.http.clone(), interaction);
        self.dispatcher
            .handle_structured(&name, &arguments, &sink)
            .await;
    }
}

#[async_trait]
impl EventHandler for RelayHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(user = ready.user.name.as_str(), "logged in to discord");
        match register_shortcut_commands(&ctx.http, self.guild_id).await {
            Ok(count) => {
                tracing::info!(count, guild = ?self.guild_id, "slash commands registered")
            }
            Err(error) => tracing::warn!(error = %error, "slash command registration failed"),
        }
    }

    async fn message(&self, ctx: Context, message: Message) {
        if message.author.bot {
            return;
        }
        let sink = ChannelMessageSink::new(ctx.http.clone(), message.channel_id);
        if self.dispatcher.handle_text(&message.content, &sink).await {
            tracing::debug!(channel = %message.channel_id, "text command handled");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.handle_shortcut(&ctx, command).await;
        }
    }
}

/// Connects to the Discord gateway and serves commands until the client stops.
pub async fn run_discord_relay(
    config: DiscordRelayConfig,
    dispatcher: CommandDispatcher,
) -> Result<()> {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let handler = RelayHandler {
        dispatcher,
        guild_id: config.guild_id.map(GuildId::new),
    };
    let mut client = Client::builder(config.token.trim(), intents)
        .event_handler(handler)
        .await
        .context("failed to create discord client")?;
    client
        .start()
        .await
        .context("discord gateway client stopped")
}
