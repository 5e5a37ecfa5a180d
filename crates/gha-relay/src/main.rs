mod bootstrap_helpers;
mod cli_args;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use gha_relay_core::{CommandDispatcher, OperationExecutor};
use gha_relay_discord::{run_discord_relay, DiscordRelayConfig};
use gha_relay_github::{GithubActionsClient, GithubActionsConfig};

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let github = GithubActionsClient::new(GithubActionsConfig {
        api_base: cli.github_api_base.clone(),
        token: cli.github_token.clone(),
        request_timeout_ms: cli.request_timeout_ms,
    })?;
    let executor = OperationExecutor::new(Arc::new(github))
        .with_command_timeout(Duration::from_millis(cli.command_timeout_ms));
    let dispatcher = CommandDispatcher::new(executor, cli.command_prefix.trim());

    tracing::info!(
        api_base = cli.github_api_base.as_str(),
        prefix = dispatcher.prefix(),
        guild_id = ?cli.discord_guild_id,
        "starting gha-relay"
    );
    run_discord_relay(
        DiscordRelayConfig {
            token: cli.discord_token.clone(),
            guild_id: cli.discord_guild_id,
        },
        dispatcher,
    )
    .await
}
