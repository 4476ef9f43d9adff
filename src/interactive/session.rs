use anyhow::{Context, Result};

use crate::remote::GitlabClient;
use crate::store::ConfigStore;

use super::ProjectChoice;

/// Everything one interactive invocation owns: the store and one client
/// per resolved profile, in resolution order.
pub(super) struct Session {
    pub store: ConfigStore,
    pub clients: Vec<GitlabClient>,
}

impl Session {
    pub fn new(store: ConfigStore, clients: Vec<GitlabClient>) -> Self {
        Self { store, clients }
    }

    /// A client scoped to the chosen project, built from the profile the
    /// choice came from.
    pub fn client_for(&self, choice: &ProjectChoice) -> Result<GitlabClient> {
        let client = self
            .clients
            .iter()
            .find(|c| c.profile().name.as_deref() == choice.profile.as_deref())
            .with_context(|| {
                format!(
                    "project '{}' belongs to profile '{}', which is not part of this session",
                    choice.label,
                    choice.profile.as_deref().unwrap_or("default")
                )
            })?;
        let mut profile = client.profile().clone();
        profile.project_ref = Some(choice.project_ref.clone());
        GitlabClient::new(profile)
    }
}
