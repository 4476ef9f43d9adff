/// A profile after all precedence rules and overrides have been applied,
/// ready to construct an API client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedProfile {
    /// Absent means the implicit default profile.
    pub name: Option<String>,

    /// Normalized absolute URL, no trailing slash.
    pub base_url: String,

    /// Always non-empty.
    pub token: String,

    /// Numeric project id or `namespace/path`. Present unless the caller
    /// resolved with `require_project: false`.
    pub project_ref: Option<String>,
}

impl ResolvedProfile {
    /// Display label for per-profile output headers.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("default")
    }
}

/// Values supplied on the command line that feed profile resolution.
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub project_id: Option<String>,
    pub project_path: Option<String>,

    /// Parsed `--profile` list, already split, trimmed and de-duplicated.
    pub profiles: Vec<String>,

    pub all_profiles: bool,
}

impl CliOverrides {
    /// A token or base URL on the command line short-circuits resolution to
    /// a single ad-hoc profile. A bare project ref does not.
    pub fn is_direct(&self) -> bool {
        self.token.is_some() || self.base_url.is_some()
    }

    /// The project reference supplied on the command line, if any.
    pub fn project_ref(&self) -> Option<String> {
        self.project_id
            .as_deref()
            .or(self.project_path.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ResolveOptions {
    /// When false, a profile may resolve without a project reference. Used
    /// by project-discovery flows only.
    pub require_project: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            require_project: true,
        }
    }
}
