use clap::Args;

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Filter by state: opened, closed, locked, merged or all
    #[arg(long, default_value = "opened")]
    pub(crate) state: String,

    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct CommentArgs {
    /// Merge request iid, e.g. 17 or !17
    pub(crate) iid: String,

    /// Comment text
    pub(crate) body: String,

    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct MergeArgs {
    /// Merge request iid, e.g. 17 or !17
    pub(crate) iid: String,

    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ReviewAssignedArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
