//! GitHub Actions REST client backing the gha-relay [`CiProvider`] seam.
//!
//! [`CiProvider`]: gha_relay_core::CiProvider

mod github_actions_client;
mod github_transport_helpers;

pub use github_actions_client::{GithubActionsClient, GithubActionsConfig, DEFAULT_GITHUB_API_BASE};
pub use github_transport_helpers::truncate_for_error;
