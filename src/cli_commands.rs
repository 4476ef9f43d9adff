use clap::Subcommand;

pub(crate) mod mr;
pub(crate) mod profile;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List merge requests for each resolved profile
    List(mr::ListArgs),

    /// Comment on a merge request
    Comment(mr::CommentArgs),

    /// Merge a merge request
    Merge(mr::MergeArgs),

    /// Merge every mergeable open merge request assigned to you
    #[command(name = "review-assigned")]
    ReviewAssigned(mr::ReviewAssignedArgs),

    /// Manage stored profiles
    Profile {
        #[command(subcommand)]
        command: profile::ProfileCommands,
    },
}
