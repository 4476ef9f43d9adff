use anyhow::{Context, Result};

use crate::model::ResolvedProfile;

mod http_client;
use self::http_client::with_retries;

mod types;
pub use self::types::*;

mod identity;
mod merge_requests;
mod projects;

pub use self::merge_requests::post_comment_verified;

/// One API client per resolved profile.
pub struct GitlabClient {
    profile: ResolvedProfile,
    client: reqwest::blocking::Client,
}

impl GitlabClient {
    pub fn new(profile: ResolvedProfile) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("mrq")
            .build()
            .context("build reqwest client")?;
        Ok(Self { profile, client })
    }

    pub fn profile(&self) -> &ResolvedProfile {
        &self.profile
    }

    /// The profile's project reference; callers that reach here have gone
    /// through resolution with `require_project: true` or picked a project
    /// interactively.
    fn project_ref(&self) -> Result<&str> {
        self.profile
            .project_ref
            .as_deref()
            .context("profile has no project reference")
    }
}
