use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub(crate) enum ProfileCommands {
    /// Add or replace a profile
    Add(AddArgs),

    /// List configured profiles
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a profile
    Remove { name: String },

    /// Set the default profile
    Default { name: String },
}

#[derive(Args)]
pub(crate) struct AddArgs {
    pub(crate) name: String,

    /// Personal access token stored with the profile
    #[arg(long)]
    pub(crate) token: String,

    /// GitLab base URL (defaults to gitlab.com at resolution time)
    #[arg(long = "base-url", value_name = "URL")]
    pub(crate) base_url: Option<String>,

    /// Numeric project id
    #[arg(long = "project-id", value_name = "ID")]
    pub(crate) project_id: Option<String>,

    /// Project reference as namespace/path
    #[arg(long = "project-path", value_name = "PATH")]
    pub(crate) project_path: Option<String>,

    #[arg(long = "display-name")]
    pub(crate) display_name: Option<String>,

    #[arg(long)]
    pub(crate) email: Option<String>,

    #[arg(long)]
    pub(crate) username: Option<String>,

    /// Make this the default profile
    #[arg(long)]
    pub(crate) default: bool,
}
