use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub last_activity_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Project-scoped id used in API paths. Listings occasionally omit it.
    #[serde(default)]
    pub iid: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub draft: bool,
    /// Older GitLab versions report draft status under this name.
    #[serde(default)]
    pub work_in_progress: bool,
    #[serde(default)]
    pub merge_status: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub source_branch: Option<String>,
    #[serde(default)]
    pub target_branch: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
}

impl MergeRequest {
    /// Eligible for the interactive merge action: not draft/WIP, no known
    /// blocking merge status, and an iid to address it by.
    pub fn is_merge_candidate(&self) -> bool {
        if self.draft || self.work_in_progress {
            return false;
        }
        if let Some(status) = self.merge_status.as_deref()
            && status != "can_be_merged"
        {
            return false;
        }
        self.iid.is_some()
    }

    pub fn branches(&self) -> String {
        format!(
            "{} -> {}",
            self.source_branch.as_deref().unwrap_or("?"),
            self.target_branch.as_deref().unwrap_or("?")
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub body: String,
}
