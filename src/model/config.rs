use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Persisted CLI configuration. Field names on disk are camelCase for
/// compatibility with hand-edited documents.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitlabCliConfig {
    /// Top-level fallback credentials, used when no named profiles exist or
    /// a profile record leaves a field unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,

    /// Name of the profile to use when none is requested explicitly. May
    /// dangle (name no configured profile); the resolver treats a dangling
    /// reference as "no default".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, StoredProfile>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl GitlabCliConfig {
    /// The profile name used when no explicit request was made: the
    /// configured default if it names an existing profile, otherwise the
    /// first configured profile.
    pub fn implied_profile(&self) -> Option<&str> {
        if let Some(name) = self.default_profile.as_deref()
            && self.profiles.contains_key(name)
        {
            return Some(name);
        }
        self.profiles.keys().next().map(|s| s.as_str())
    }

    /// Overlay `other` on top of `self`, field by field. Profiles with the
    /// same name are replaced wholesale, not merged.
    pub fn merged_with(mut self, other: GitlabCliConfig) -> GitlabCliConfig {
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.project_id.is_some() {
            self.project_id = other.project_id;
        }
        if other.project_path.is_some() {
            self.project_path = other.project_path;
        }
        if other.default_profile.is_some() {
            self.default_profile = other.default_profile;
        }
        for (name, profile) in other.profiles {
            self.profiles.insert(name, profile);
        }
        self
    }
}
