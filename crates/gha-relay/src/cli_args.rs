use clap::Parser;
use gha_relay_core::DEFAULT_COMMAND_PREFIX;
use gha_relay_github::DEFAULT_GITHUB_API_BASE;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_command_prefix(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return Err("command prefix must be a single non-empty token".to_string());
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Parser)]
#[command(
    name = "gha-relay",
    about = "Trigger and inspect GitHub Actions workflows from Discord",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long = "discord-token",
        env = "DISCORD_TOKEN",
        hide_env_values = true,
        help = "Discord bot token used for the gateway session"
    )]
    pub discord_token: String,

    #[arg(
        long = "discord-guild-id",
        env = "DISCORD_GUILD_ID",
        help = "Guild to register slash commands on. Commands are registered globally when unset"
    )]
    pub discord_guild_id: Option<u64>,

    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub installation or personal access token with actions:write"
    )]
    pub github_token: String,

    #[arg(
        long = "github-api-base",
        env = "GITHUB_API_BASE",
        default_value = DEFAULT_GITHUB_API_BASE,
        help = "Base URL for the GitHub REST API"
    )]
    pub github_api_base: String,

    #[arg(
        long = "command-prefix",
        env = "GHA_RELAY_COMMAND_PREFIX",
        default_value = DEFAULT_COMMAND_PREFIX,
        value_parser = parse_command_prefix,
        help = "Trigger token that marks a chat message as a text command"
    )]
    pub command_prefix: String,

    #[arg(
        long = "request-timeout-ms",
        env = "GHA_RELAY_REQUEST_TIMEOUT_MS",
        default_value_t = 15_000,
        value_parser = parse_positive_u64,
        help = "Timeout for a single GitHub API request"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "command-timeout-ms",
        env = "GHA_RELAY_COMMAND_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Deadline for all provider calls made by one command"
    )]
    pub command_timeout_ms: u64,
}
