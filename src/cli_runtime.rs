use anyhow::Result;
use clap::{Args, Parser};

use mrq::interactive;
use mrq::model::CliOverrides;
use mrq::resolve::parse_profile_list;

use crate::cli_commands::Commands;

#[derive(Parser)]
#[command(name = "mrq")]
#[command(about = "GitLab merge-request helper", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    overrides: OverrideFlags,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Flags feeding profile resolution, accepted by every subcommand.
#[derive(Args, Clone)]
pub(crate) struct OverrideFlags {
    /// Personal access token (bypasses profiles and config)
    #[arg(long, global = true)]
    token: Option<String>,

    /// GitLab base URL (bypasses profiles and config)
    #[arg(long = "base-url", global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Numeric project id
    #[arg(long = "project-id", global = true, value_name = "ID")]
    project_id: Option<String>,

    /// Project reference as namespace/path
    #[arg(long = "project-path", global = true, value_name = "PATH")]
    project_path: Option<String>,

    /// Profile name(s), comma-separated
    #[arg(long, global = true, value_name = "NAME[,NAME...]")]
    profile: Option<String>,

    /// Act on every configured profile
    #[arg(long = "all-profiles", global = true)]
    all_profiles: bool,
}

impl OverrideFlags {
    fn to_overrides(&self) -> CliOverrides {
        CliOverrides {
            token: self.token.clone(),
            base_url: self.base_url.clone(),
            project_id: self.project_id.clone(),
            project_path: self.project_path.clone(),
            profiles: self
                .profile
                .as_deref()
                .map(parse_profile_list)
                .unwrap_or_default(),
            all_profiles: self.all_profiles,
        }
    }
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let overrides = cli.overrides.to_overrides();

    match cli.command {
        None => interactive::run(&overrides),
        Some(command) => crate::cli_exec::handle_command(command, &overrides),
    }
}
