use serde::{Deserialize, Serialize};

/// One entry of the persisted favorites list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteProjectRecord {
    /// Numeric project id or `namespace/path`.
    pub project_ref: String,

    /// Profile the project was favorited under; absent means the implicit
    /// default profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
}

impl FavoriteProjectRecord {
    pub fn key(&self) -> String {
        favorite_key(self.profile.as_deref(), &self.project_ref)
    }

    /// A record is usable only with a non-empty project ref.
    pub fn is_valid(&self) -> bool {
        !self.project_ref.trim().is_empty()
    }
}

/// Identity key for a (profile, project) pair.
pub fn favorite_key(profile: Option<&str>, project_ref: &str) -> String {
    format!("{}:::{}", profile.unwrap_or("default"), project_ref)
}
