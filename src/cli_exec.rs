use anyhow::Result;

use mrq::model::{CliOverrides, ResolveOptions};
use mrq::remote::GitlabClient;
use mrq::resolve::{self, Env};
use mrq::store::ConfigStore;

use crate::cli_commands::Commands;

mod mr;
mod profile;
mod review;

pub(crate) fn handle_command(command: Commands, overrides: &CliOverrides) -> Result<()> {
    match command {
        Commands::List(args) => mr::handle_list(overrides, args),
        Commands::Comment(args) => mr::handle_comment(overrides, args),
        Commands::Merge(args) => mr::handle_merge(overrides, args),
        Commands::ReviewAssigned(args) => review::handle_review_assigned(overrides, args),
        Commands::Profile { command } => profile::handle_profile_command(command),
    }
}

/// One API client per resolved profile, in resolution order.
fn resolved_clients(overrides: &CliOverrides) -> Result<Vec<GitlabClient>> {
    let store = ConfigStore::open()?;
    let config = store.read_config();
    let env = Env::from_process();
    let profiles = resolve::resolve(
        overrides,
        &ResolveOptions {
            require_project: true,
        },
        &config,
        &env,
    )?;
    profiles.into_iter().map(GitlabClient::new).collect()
}

/// Merge request iids are accepted with or without the `!` sigil.
fn parse_iid(raw: &str) -> Result<u64> {
    let trimmed = raw.trim().trim_start_matches('!');
    trimmed
        .parse::<u64>()
        .map_err(|_| anyhow::anyhow!("invalid merge request iid '{}'", raw))
}
