//! Profile resolution: turns CLI flags, config documents and environment
//! variables into an ordered list of fully-resolved profiles.
//!
//! The precedence chain, each level short-circuiting the whole resolution:
//!
//! 1. direct CLI override (a token or base URL on the command line)
//! 2. named profiles from the config document
//! 3. the document's top-level fallback fields
//! 4. env-declared profiles (`GITLAB_PROFILES` + `GITLAB_<NAME>_*`)
//! 5. legacy single-value env vars (`GITLAB_TOKEN`, ...)
//! 6. the level-1 resolution once more, as the terminal failure path

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{CliOverrides, GitlabCliConfig, ResolveOptions, ResolvedProfile, StoredProfile};

pub const DEFAULT_BASE_URL: &str = "https://gitlab.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no GitLab token found (pass --token or set GITLAB_TOKEN)")]
    MissingToken,

    #[error(
        "no project reference found (pass --project-id/--project-path or set GITLAB_PROJECT_ID/GITLAB_PROJECT_PATH)"
    )]
    MissingProjectRef,

    #[error("profile '{profile}' has no token (add \"token\" to its config entry)")]
    ProfileMissingToken { profile: String },

    #[error(
        "profile '{profile}' has no project reference (add \"projectId\" or \"projectPath\" to its config entry, or pass --project-id/--project-path)"
    )]
    ProfileMissingProject { profile: String },

    #[error("profile '{profile}' has no token (set {var})")]
    EnvProfileMissingToken { profile: String, var: String },

    #[error(
        "profile '{profile}' has no project reference (set {id_var} or {path_var}, or pass --project-id/--project-path)"
    )]
    EnvProfileMissingProject {
        profile: String,
        id_var: String,
        path_var: String,
    },
}

/// Snapshot of the process environment. Taken once per resolution so the
/// chain is a pure function of its inputs.
#[derive(Clone, Debug, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Trimmed, non-empty value lookup. Blank variables count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Environment variable name for a per-profile field, e.g.
/// `env_key_for("team-a", "TOKEN")` -> `GITLAB_TEAM_A_TOKEN`.
pub fn env_key_for(profile: &str, field: &str) -> String {
    let sanitized: String = profile
        .to_uppercase()
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("GITLAB_{}_{}", sanitized, field)
}

/// Trim, then strip trailing slashes. If stripping empties the value, the
/// trimmed original is kept.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed.trim_end_matches('/');
    if stripped.is_empty() {
        trimmed.to_string()
    } else {
        stripped.to_string()
    }
}

/// Split a `--profile` value on commas, trim entries, drop blanks and
/// de-duplicate by order of first appearance.
pub fn parse_profile_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let name = part.trim();
        if name.is_empty() || out.iter().any(|p| p == name) {
            continue;
        }
        out.push(name.to_string());
    }
    out
}

pub fn resolve(
    overrides: &CliOverrides,
    opts: &ResolveOptions,
    config: &GitlabCliConfig,
    env: &Env,
) -> Result<Vec<ResolvedProfile>, ConfigError> {
    // Level 1: a token or base URL on the command line wins outright.
    if overrides.is_direct() {
        return resolve_single(overrides, opts, env).map(|p| vec![p]);
    }

    // Level 2: named profiles from the config document.
    let resolved = resolve_configured(overrides, opts, config)?;
    if !resolved.is_empty() {
        return Ok(resolved);
    }

    // Level 3: the document's top-level fields as one implicit profile.
    if let Some(token) = nonempty(config.token.as_deref()) {
        let project_ref = overrides.project_ref().or_else(|| {
            nonempty(config.project_id.as_deref()).or_else(|| nonempty(config.project_path.as_deref()))
        });
        if project_ref.is_some() || !opts.require_project {
            let base_url = nonempty(config.base_url.as_deref())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            return Ok(vec![ResolvedProfile {
                name: None,
                base_url: normalize_base_url(&base_url),
                token,
                project_ref,
            }]);
        }
    }

    // Level 4: profiles declared through the environment.
    let resolved = resolve_env_profiles(overrides, opts, env)?;
    if !resolved.is_empty() {
        return Ok(resolved);
    }

    // Level 5: legacy single-value environment fallback.
    if let Some(token) = env.get("GITLAB_TOKEN") {
        let project_ref = overrides
            .project_ref()
            .or_else(|| env.get("GITLAB_PROJECT_ID"))
            .or_else(|| env.get("GITLAB_PROJECT_PATH"));
        if project_ref.is_some() || !opts.require_project {
            let base_url = env
                .get("GITLAB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            return Ok(vec![ResolvedProfile {
                name: None,
                base_url: normalize_base_url(&base_url),
                token,
                project_ref,
            }]);
        }
    }

    // Level 6: terminal failure path, raising the standard messages.
    resolve_single(overrides, opts, env).map(|p| vec![p])
}

/// Level 1 / level 6: one ad-hoc profile from CLI values with env fallbacks.
fn resolve_single(
    overrides: &CliOverrides,
    opts: &ResolveOptions,
    env: &Env,
) -> Result<ResolvedProfile, ConfigError> {
    let token = nonempty(overrides.token.as_deref())
        .or_else(|| env.get("GITLAB_TOKEN"))
        .ok_or(ConfigError::MissingToken)?;

    let base_url = nonempty(overrides.base_url.as_deref())
        .or_else(|| env.get("GITLAB_BASE_URL"))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let project_ref = overrides
        .project_ref()
        .or_else(|| env.get("GITLAB_PROJECT_ID"))
        .or_else(|| env.get("GITLAB_PROJECT_PATH"));
    if project_ref.is_none() && opts.require_project {
        return Err(ConfigError::MissingProjectRef);
    }

    Ok(ResolvedProfile {
        name: None,
        base_url: normalize_base_url(&base_url),
        token,
        project_ref,
    })
}

fn resolve_configured(
    overrides: &CliOverrides,
    opts: &ResolveOptions,
    config: &GitlabCliConfig,
) -> Result<Vec<ResolvedProfile>, ConfigError> {
    let requested: Vec<String> = if overrides.all_profiles {
        config.profiles.keys().cloned().collect()
    } else if !overrides.profiles.is_empty() {
        overrides.profiles.clone()
    } else {
        config.implied_profile().map(str::to_string).into_iter().collect()
    };

    let mut out = Vec::new();
    for name in requested {
        // Names absent from the document fall through to later levels.
        let Some(stored) = config.profiles.get(&name) else {
            continue;
        };
        out.push(build_configured(&name, stored, overrides, opts, config)?);
    }
    Ok(out)
}

fn build_configured(
    name: &str,
    stored: &StoredProfile,
    overrides: &CliOverrides,
    opts: &ResolveOptions,
    config: &GitlabCliConfig,
) -> Result<ResolvedProfile, ConfigError> {
    let token = nonempty(stored.token.as_deref())
        .or_else(|| nonempty(config.token.as_deref()))
        .ok_or_else(|| ConfigError::ProfileMissingToken {
            profile: name.to_string(),
        })?;

    let base_url = nonempty(stored.base_url.as_deref())
        .or_else(|| nonempty(config.base_url.as_deref()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // A project ref on the command line redirects the profile.
    let project_ref = overrides
        .project_ref()
        .or_else(|| nonempty(stored.project_id.as_deref()))
        .or_else(|| nonempty(stored.project_path.as_deref()))
        .or_else(|| nonempty(config.project_id.as_deref()))
        .or_else(|| nonempty(config.project_path.as_deref()));
    if project_ref.is_none() && opts.require_project {
        return Err(ConfigError::ProfileMissingProject {
            profile: name.to_string(),
        });
    }

    Ok(ResolvedProfile {
        name: Some(name.to_string()),
        base_url: normalize_base_url(&base_url),
        token,
        project_ref,
    })
}

fn resolve_env_profiles(
    overrides: &CliOverrides,
    opts: &ResolveOptions,
    env: &Env,
) -> Result<Vec<ResolvedProfile>, ConfigError> {
    let declared: Vec<String> = env
        .get("GITLAB_PROFILES")
        .map(|raw| parse_profile_list(&raw))
        .unwrap_or_default();
    if declared.is_empty() {
        return Ok(Vec::new());
    }

    let requested: Vec<String> = if overrides.all_profiles {
        declared
    } else if !overrides.profiles.is_empty() {
        overrides.profiles.clone()
    } else {
        vec![declared[0].clone()]
    };

    let mut out = Vec::new();
    for name in requested {
        let token_var = env_key_for(&name, "TOKEN");
        let token = env
            .get(&token_var)
            .ok_or_else(|| ConfigError::EnvProfileMissingToken {
                profile: name.clone(),
                var: token_var,
            })?;

        let project_ref = overrides
            .project_ref()
            .or_else(|| env.get(&env_key_for(&name, "PROJECT_ID")))
            .or_else(|| env.get(&env_key_for(&name, "PROJECT_PATH")));
        if project_ref.is_none() && opts.require_project {
            return Err(ConfigError::EnvProfileMissingProject {
                id_var: env_key_for(&name, "PROJECT_ID"),
                path_var: env_key_for(&name, "PROJECT_PATH"),
                profile: name,
            });
        }

        let base_url = env
            .get(&env_key_for(&name, "BASE_URL"))
            .or_else(|| env.get("GITLAB_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        out.push(ResolvedProfile {
            name: Some(name),
            base_url: normalize_base_url(&base_url),
            token,
            project_ref,
        });
    }
    Ok(out)
}

fn nonempty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn require() -> ResolveOptions {
        ResolveOptions {
            require_project: true,
        }
    }

    fn no_project() -> ResolveOptions {
        ResolveOptions {
            require_project: false,
        }
    }

    fn stored(token: Option<&str>, project_id: Option<&str>) -> StoredProfile {
        StoredProfile {
            token: token.map(str::to_string),
            project_id: project_id.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn direct_cli_override_wins_over_everything() {
        let overrides = CliOverrides {
            token: Some("cli-token".into()),
            base_url: Some("https://cli.example.com".into()),
            project_id: Some("333".into()),
            ..Default::default()
        };
        let mut config = GitlabCliConfig {
            token: Some("conf-token".into()),
            ..Default::default()
        };
        config
            .profiles
            .insert("teamA".into(), stored(Some("token-a"), Some("111")));
        let env = Env::from_pairs([("GITLAB_TOKEN", "env-token")]);

        let out = resolve(&overrides, &require(), &config, &env).unwrap();
        assert_eq!(
            out,
            vec![ResolvedProfile {
                name: None,
                base_url: "https://cli.example.com".into(),
                token: "cli-token".into(),
                project_ref: Some("333".into()),
            }]
        );
    }

    #[test]
    fn direct_override_fills_gaps_from_env() {
        let overrides = CliOverrides {
            token: Some("cli-token".into()),
            ..Default::default()
        };
        let env = Env::from_pairs([
            ("GITLAB_BASE_URL", "https://env.example.com/"),
            ("GITLAB_PROJECT_PATH", "group/app"),
        ]);

        let out = resolve(&overrides, &require(), &GitlabCliConfig::default(), &env).unwrap();
        assert_eq!(out[0].base_url, "https://env.example.com");
        assert_eq!(out[0].project_ref.as_deref(), Some("group/app"));
    }

    #[test]
    fn bare_project_ref_does_not_short_circuit() {
        // Only a project ref on the CLI: resolution falls through to the
        // config document instead of the ad-hoc single-profile path.
        let overrides = CliOverrides {
            project_id: Some("999".into()),
            ..Default::default()
        };
        let mut config = GitlabCliConfig::default();
        config
            .profiles
            .insert("teamA".into(), stored(Some("token-a"), Some("111")));

        let out = resolve(&overrides, &require(), &config, &Env::default()).unwrap();
        assert_eq!(out[0].name.as_deref(), Some("teamA"));
        assert_eq!(out[0].token, "token-a");
        assert_eq!(out[0].project_ref.as_deref(), Some("999"));
    }

    #[test]
    fn top_level_document_fields_resolve_verbatim() {
        let config = GitlabCliConfig {
            token: Some("conf-token".into()),
            project_id: Some("111".into()),
            base_url: Some("https://conf.example.com".into()),
            ..Default::default()
        };
        let out = resolve(
            &CliOverrides::default(),
            &require(),
            &config,
            &Env::default(),
        )
        .unwrap();
        assert_eq!(
            out,
            vec![ResolvedProfile {
                name: None,
                base_url: "https://conf.example.com".into(),
                token: "conf-token".into(),
                project_ref: Some("111".into()),
            }]
        );
    }

    #[test]
    fn default_profile_is_used_when_none_requested() {
        let mut config = GitlabCliConfig::default();
        config
            .profiles
            .insert("alpha".into(), stored(Some("token-a"), Some("1")));
        config
            .profiles
            .insert("beta".into(), stored(Some("token-b"), Some("2")));
        config.default_profile = Some("beta".into());

        let out = resolve(
            &CliOverrides::default(),
            &require(),
            &config,
            &Env::default(),
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name.as_deref(), Some("beta"));
    }

    #[test]
    fn dangling_default_falls_back_to_first_profile() {
        let mut config = GitlabCliConfig::default();
        config
            .profiles
            .insert("alpha".into(), stored(Some("token-a"), Some("1")));
        config.default_profile = Some("removed".into());

        let out = resolve(
            &CliOverrides::default(),
            &require(),
            &config,
            &Env::default(),
        )
        .unwrap();
        assert_eq!(out[0].name.as_deref(), Some("alpha"));
    }

    #[test]
    fn all_profiles_fans_out_over_config() {
        let mut config = GitlabCliConfig::default();
        config
            .profiles
            .insert("alpha".into(), stored(Some("token-a"), Some("1")));
        config
            .profiles
            .insert("beta".into(), stored(Some("token-b"), Some("2")));
        let overrides = CliOverrides {
            all_profiles: true,
            ..Default::default()
        };

        let out = resolve(&overrides, &require(), &config, &Env::default()).unwrap();
        let names: Vec<_> = out.iter().filter_map(|p| p.name.as_deref()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn profile_falls_back_to_document_top_level_fields() {
        let mut config = GitlabCliConfig {
            token: Some("shared-token".into()),
            base_url: Some("https://shared.example.com".into()),
            ..Default::default()
        };
        config
            .profiles
            .insert("thin".into(), stored(None, Some("7")));

        let overrides = CliOverrides {
            profiles: vec!["thin".into()],
            ..Default::default()
        };
        let out = resolve(&overrides, &require(), &config, &Env::default()).unwrap();
        assert_eq!(out[0].token, "shared-token");
        assert_eq!(out[0].base_url, "https://shared.example.com");
    }

    #[test]
    fn cli_project_ref_overrides_stored_one() {
        let mut config = GitlabCliConfig::default();
        config
            .profiles
            .insert("teamA".into(), stored(Some("token-a"), Some("111")));
        let overrides = CliOverrides {
            profiles: vec!["teamA".into()],
            project_id: Some("999".into()),
            ..Default::default()
        };

        let out = resolve(&overrides, &require(), &config, &Env::default()).unwrap();
        assert_eq!(out[0].token, "token-a");
        assert_eq!(out[0].project_ref.as_deref(), Some("999"));
    }

    #[test]
    fn configured_profile_without_token_is_a_hard_failure() {
        let mut config = GitlabCliConfig::default();
        config.profiles.insert("broken".into(), stored(None, Some("1")));
        let overrides = CliOverrides {
            profiles: vec!["broken".into()],
            ..Default::default()
        };

        let err = resolve(&overrides, &require(), &config, &Env::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ProfileMissingToken { profile } if profile == "broken"
        ));
    }

    #[test]
    fn unknown_profile_names_fall_through_to_env() {
        let mut config = GitlabCliConfig::default();
        config
            .profiles
            .insert("other".into(), stored(Some("token-o"), Some("5")));
        let overrides = CliOverrides {
            profiles: vec!["envonly".into()],
            ..Default::default()
        };
        let env = Env::from_pairs([
            ("GITLAB_PROFILES", "envonly"),
            ("GITLAB_ENVONLY_TOKEN", "token-e"),
            ("GITLAB_ENVONLY_PROJECT_ID", "88"),
        ]);

        let out = resolve(&overrides, &require(), &config, &env).unwrap();
        assert_eq!(out[0].name.as_deref(), Some("envonly"));
        assert_eq!(out[0].token, "token-e");
    }

    #[test]
    fn env_profiles_fan_out_with_all_profiles() {
        let overrides = CliOverrides {
            all_profiles: true,
            ..Default::default()
        };
        let env = Env::from_pairs([
            ("GITLAB_PROFILES", "A,B"),
            ("GITLAB_A_TOKEN", "token-a"),
            ("GITLAB_A_PROJECT_ID", "100"),
            ("GITLAB_B_TOKEN", "token-b"),
            ("GITLAB_B_PROJECT_PATH", "group/b"),
        ]);

        let out = resolve(
            &overrides,
            &require(),
            &GitlabCliConfig::default(),
            &env,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name.as_deref(), Some("A"));
        assert_eq!(out[0].token, "token-a");
        assert_eq!(out[0].project_ref.as_deref(), Some("100"));
        assert_eq!(out[0].base_url, DEFAULT_BASE_URL);
        assert_eq!(out[1].name.as_deref(), Some("B"));
        assert_eq!(out[1].token, "token-b");
        assert_eq!(out[1].project_ref.as_deref(), Some("group/b"));
    }

    #[test]
    fn env_profiles_default_to_first_declared() {
        let env = Env::from_pairs([
            ("GITLAB_PROFILES", "first, second"),
            ("GITLAB_FIRST_TOKEN", "token-1"),
            ("GITLAB_FIRST_PROJECT_ID", "10"),
            ("GITLAB_SECOND_TOKEN", "token-2"),
            ("GITLAB_SECOND_PROJECT_ID", "20"),
        ]);
        let out = resolve(
            &CliOverrides::default(),
            &require(),
            &GitlabCliConfig::default(),
            &env,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name.as_deref(), Some("first"));
    }

    #[test]
    fn env_profile_missing_token_names_the_variable() {
        let overrides = CliOverrides {
            all_profiles: true,
            ..Default::default()
        };
        let env = Env::from_pairs([("GITLAB_PROFILES", "team-a")]);
        let err = resolve(
            &overrides,
            &require(),
            &GitlabCliConfig::default(),
            &env,
        )
        .unwrap_err();
        match err {
            ConfigError::EnvProfileMissingToken { profile, var } => {
                assert_eq!(profile, "team-a");
                assert_eq!(var, "GITLAB_TEAM_A_TOKEN");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn env_profile_missing_project_names_both_variables() {
        let env = Env::from_pairs([
            ("GITLAB_PROFILES", "a"),
            ("GITLAB_A_TOKEN", "token-a"),
        ]);
        let err = resolve(
            &CliOverrides::default(),
            &require(),
            &GitlabCliConfig::default(),
            &env,
        )
        .unwrap_err();
        match err {
            ConfigError::EnvProfileMissingProject {
                profile,
                id_var,
                path_var,
            } => {
                assert_eq!(profile, "a");
                assert_eq!(id_var, "GITLAB_A_PROJECT_ID");
                assert_eq!(path_var, "GITLAB_A_PROJECT_PATH");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn legacy_env_fallback_resolves_one_profile() {
        let env = Env::from_pairs([
            ("GITLAB_TOKEN", "legacy-token"),
            ("GITLAB_PROJECT_ID", "44"),
        ]);
        let out = resolve(
            &CliOverrides::default(),
            &require(),
            &GitlabCliConfig::default(),
            &env,
        )
        .unwrap();
        assert_eq!(
            out,
            vec![ResolvedProfile {
                name: None,
                base_url: DEFAULT_BASE_URL.into(),
                token: "legacy-token".into(),
                project_ref: Some("44".into()),
            }]
        );
    }

    #[test]
    fn missing_everything_raises_missing_token() {
        let err = resolve(
            &CliOverrides::default(),
            &require(),
            &GitlabCliConfig::default(),
            &Env::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn token_without_project_raises_missing_project() {
        let env = Env::from_pairs([("GITLAB_TOKEN", "t")]);
        let err = resolve(
            &CliOverrides::default(),
            &require(),
            &GitlabCliConfig::default(),
            &env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingProjectRef));
    }

    #[test]
    fn projectless_resolution_succeeds_when_not_required() {
        let config = GitlabCliConfig {
            token: Some("t".into()),
            ..Default::default()
        };
        let out = resolve(
            &CliOverrides::default(),
            &no_project(),
            &config,
            &Env::default(),
        )
        .unwrap();
        assert_eq!(out[0].project_ref, None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_base_url("https://x.com///");
        assert_eq!(once, "https://x.com");
        assert_eq!(normalize_base_url(&once), "https://x.com");
        // Stripping that would empty the value keeps the trimmed original.
        assert_eq!(normalize_base_url("  ///  "), "///");
    }

    #[test]
    fn profile_list_parsing_trims_and_dedups() {
        assert_eq!(
            parse_profile_list(" a, b ,a,,c , b"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn env_key_sanitizes_non_alphanumerics() {
        assert_eq!(env_key_for("team-a.2", "TOKEN"), "GITLAB_TEAM_A_2_TOKEN");
        assert_eq!(env_key_for("B", "PROJECT_PATH"), "GITLAB_B_PROJECT_PATH");
    }

    #[test]
    fn blank_env_values_count_as_unset() {
        let env = Env::from_pairs([("GITLAB_TOKEN", "   ")]);
        let err = resolve(
            &CliOverrides::default(),
            &no_project(),
            &GitlabCliConfig::default(),
            &env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }
}
