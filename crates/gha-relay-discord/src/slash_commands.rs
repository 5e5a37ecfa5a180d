//! Slash-command schema for the shortcut commands and its registration.

use std::collections::HashMap;

use anyhow::{Context, Result};
use gha_relay_core::ShortcutCommand;
use serenity::all::{
    Command as ApplicationCommand, CommandDataOptionValue, CommandInteraction, CommandOptionType,
    CreateCommand, CreateCommandOption, GuildId, Http,
};

const SHORTCUT_OPTIONS: [(&str, &str); 2] = [
    ("owner", "Repository owner"),
    ("repo", "Repository name"),
];

pub fn shortcut_command_definitions() -> Vec<CreateCommand> {
    ShortcutCommand::ALL
        .iter()
        .map(|shortcut| {
            SHORTCUT_OPTIONS.iter().fold(
                CreateCommand::new(shortcut.name()).description(shortcut.description()),
                |command, (name, description)| {
                    command.add_option(
                        CreateCommandOption::new(CommandOptionType::String, *name, *description)
                            .required(true),
                    )
                },
            )
        })
        .collect()
}

/// Registers the shortcut commands on one guild, or globally when no guild is configured.
pub async fn register_shortcut_commands(http: &Http, guild_id: Option<GuildId>) -> Result<usize> {
    let definitions = shortcut_command_definitions();
    let registered = match guild_id {
        Some(guild_id) => guild_id
            .set_commands(http, definitions)
            .await
            .with_context(|| format!("failed to register slash commands for guild {guild_id}"))?,
        None => ApplicationCommand::set_global_commands(http, definitions)
            .await
            .context("failed to register global slash commands")?,
    };
    Ok(registered.len())
}

/// Collects the string options of an interaction by name.
pub(crate) fn interaction_arguments(interaction: &CommandInteraction) -> HashMap<String, String> {
    interaction
        .data
        .options
        .iter()
        .filter_map(|option| match &option.value {
            CommandDataOptionValue::String(value) => Some((option.name.clone(), value.clone())),
            _ => None,
        })
        .collect()
}
