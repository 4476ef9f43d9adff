use mrq::model::{CliOverrides, GitlabCliConfig, ResolveOptions, StoredProfile};
use mrq::resolve::{self, ConfigError, Env};

fn stored(token: &str, project_id: Option<&str>) -> StoredProfile {
    StoredProfile {
        token: Some(token.to_string()),
        project_id: project_id.map(str::to_string),
        ..Default::default()
    }
}

fn full_config() -> GitlabCliConfig {
    let mut cfg = GitlabCliConfig {
        token: Some("top-token".into()),
        project_id: Some("9".into()),
        ..Default::default()
    };
    cfg.profiles
        .insert("work".into(), stored("work-token", Some("1")));
    cfg.profiles
        .insert("home".into(), stored("home-token", Some("2")));
    cfg.default_profile = Some("work".into());
    cfg
}

fn full_env() -> Env {
    Env::from_pairs([
        ("GITLAB_TOKEN", "env-token"),
        ("GITLAB_PROJECT_ID", "77"),
        ("GITLAB_PROFILES", "alpha"),
        ("GITLAB_ALPHA_TOKEN", "alpha-token"),
        ("GITLAB_ALPHA_PROJECT_ID", "5"),
    ])
}

#[test]
fn cli_token_beats_config_and_env() {
    let overrides = CliOverrides {
        token: Some("cli-token".into()),
        project_id: Some("3".into()),
        ..Default::default()
    };
    let out = resolve::resolve(
        &overrides,
        &ResolveOptions::default(),
        &full_config(),
        &full_env(),
    )
    .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].token, "cli-token");
    assert_eq!(out[0].name, None);
    assert_eq!(out[0].project_ref.as_deref(), Some("3"));
}

#[test]
fn bare_project_id_does_not_short_circuit() {
    // A project ref alone redirects whichever profile wins, it does not
    // create an ad-hoc one.
    let overrides = CliOverrides {
        project_id: Some("42".into()),
        ..Default::default()
    };
    let out = resolve::resolve(
        &overrides,
        &ResolveOptions::default(),
        &full_config(),
        &full_env(),
    )
    .unwrap();
    assert_eq!(out[0].name.as_deref(), Some("work"));
    assert_eq!(out[0].token, "work-token");
    assert_eq!(out[0].project_ref.as_deref(), Some("42"));
}

#[test]
fn default_profile_wins_over_env() {
    let out = resolve::resolve(
        &CliOverrides::default(),
        &ResolveOptions::default(),
        &full_config(),
        &full_env(),
    )
    .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name.as_deref(), Some("work"));
    assert_eq!(out[0].token, "work-token");
    assert_eq!(out[0].project_ref.as_deref(), Some("1"));
    assert_eq!(out[0].base_url, "https://gitlab.com");
}

#[test]
fn profile_flag_selects_several_in_order() {
    let overrides = CliOverrides {
        profiles: vec!["home".into(), "work".into()],
        ..Default::default()
    };
    let out = resolve::resolve(
        &overrides,
        &ResolveOptions::default(),
        &full_config(),
        &Env::default(),
    )
    .unwrap();
    let names: Vec<_> = out.iter().map(|p| p.name.as_deref()).collect();
    assert_eq!(names, vec![Some("home"), Some("work")]);
}

#[test]
fn all_profiles_resolves_every_configured_one() {
    let overrides = CliOverrides {
        all_profiles: true,
        ..Default::default()
    };
    let out = resolve::resolve(
        &overrides,
        &ResolveOptions::default(),
        &full_config(),
        &Env::default(),
    )
    .unwrap();
    assert_eq!(out.len(), 2);
}

#[test]
fn unknown_profile_name_falls_through_to_env() {
    let overrides = CliOverrides {
        profiles: vec!["ghost".into()],
        ..Default::default()
    };
    let out = resolve::resolve(
        &overrides,
        &ResolveOptions::default(),
        &full_config(),
        &Env::from_pairs([("GITLAB_TOKEN", "env-token"), ("GITLAB_PROJECT_ID", "8")]),
    )
    .unwrap();
    assert_eq!(out[0].name, None);
    assert_eq!(out[0].token, "env-token");
}

#[test]
fn configured_profile_without_token_is_a_hard_error() {
    let mut cfg = GitlabCliConfig::default();
    cfg.profiles.insert(
        "broken".into(),
        StoredProfile {
            project_id: Some("1".into()),
            ..Default::default()
        },
    );
    let err = resolve::resolve(
        &CliOverrides::default(),
        &ResolveOptions::default(),
        &cfg,
        &Env::from_pairs([("GITLAB_TOKEN", "env-token"), ("GITLAB_PROJECT_ID", "8")]),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ProfileMissingToken { .. }));
}

#[test]
fn top_level_fields_act_as_implicit_profile() {
    let cfg = GitlabCliConfig {
        token: Some("top-token".into()),
        base_url: Some("https://git.example.com/".into()),
        project_path: Some("group/app".into()),
        ..Default::default()
    };
    let out = resolve::resolve(
        &CliOverrides::default(),
        &ResolveOptions::default(),
        &cfg,
        &Env::default(),
    )
    .unwrap();
    assert_eq!(out[0].token, "top-token");
    assert_eq!(out[0].base_url, "https://git.example.com");
    assert_eq!(out[0].project_ref.as_deref(), Some("group/app"));
}

#[test]
fn env_declared_profiles_resolve_with_sanitized_keys() {
    let env = Env::from_pairs([
        ("GITLAB_PROFILES", "team-a,team-b"),
        ("GITLAB_TEAM_A_TOKEN", "a-token"),
        ("GITLAB_TEAM_A_PROJECT_PATH", "teams/a"),
        ("GITLAB_TEAM_B_TOKEN", "b-token"),
        ("GITLAB_TEAM_B_PROJECT_ID", "6"),
        ("GITLAB_BASE_URL", "https://git.corp.example"),
    ]);
    let overrides = CliOverrides {
        all_profiles: true,
        ..Default::default()
    };
    let out = resolve::resolve(
        &overrides,
        &ResolveOptions::default(),
        &GitlabCliConfig::default(),
        &env,
    )
    .unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].name.as_deref(), Some("team-a"));
    assert_eq!(out[0].project_ref.as_deref(), Some("teams/a"));
    assert_eq!(out[0].base_url, "https://git.corp.example");
    assert_eq!(out[1].token, "b-token");
}

#[test]
fn env_profile_without_token_names_the_variable() {
    let env = Env::from_pairs([("GITLAB_PROFILES", "solo")]);
    let err = resolve::resolve(
        &CliOverrides::default(),
        &ResolveOptions::default(),
        &GitlabCliConfig::default(),
        &env,
    )
    .unwrap_err();
    match err {
        ConfigError::EnvProfileMissingToken { profile, var } => {
            assert_eq!(profile, "solo");
            assert_eq!(var, "GITLAB_SOLO_TOKEN");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn legacy_env_token_is_the_last_resort() {
    let env = Env::from_pairs([("GITLAB_TOKEN", "legacy"), ("GITLAB_PROJECT_PATH", "g/p")]);
    let out = resolve::resolve(
        &CliOverrides::default(),
        &ResolveOptions::default(),
        &GitlabCliConfig::default(),
        &env,
    )
    .unwrap();
    assert_eq!(out[0].token, "legacy");
    assert_eq!(out[0].project_ref.as_deref(), Some("g/p"));
}

#[test]
fn nothing_configured_reports_missing_token() {
    let err = resolve::resolve(
        &CliOverrides::default(),
        &ResolveOptions::default(),
        &GitlabCliConfig::default(),
        &Env::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingToken));
}

#[test]
fn missing_project_is_tolerated_for_discovery() {
    let env = Env::from_pairs([("GITLAB_TOKEN", "legacy")]);
    let opts = ResolveOptions {
        require_project: false,
    };
    let out = resolve::resolve(&CliOverrides::default(), &opts, &GitlabCliConfig::default(), &env)
        .unwrap();
    assert_eq!(out[0].project_ref, None);

    let err = resolve::resolve(
        &CliOverrides::default(),
        &ResolveOptions::default(),
        &GitlabCliConfig::default(),
        &env,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingProjectRef));
}

#[test]
fn blank_environment_values_count_as_unset() {
    let env = Env::from_pairs([("GITLAB_TOKEN", "   "), ("GITLAB_PROJECT_ID", "8")]);
    let err = resolve::resolve(
        &CliOverrides::default(),
        &ResolveOptions::default(),
        &GitlabCliConfig::default(),
        &env,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingToken));
}
