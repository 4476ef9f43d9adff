use std::io::{self, IsTerminal};

use anyhow::Result;

use crate::model::{CliOverrides, ResolveOptions, ResolvedProfile, StoredProfile};
use crate::resolve::{self, DEFAULT_BASE_URL, Env};
use crate::select::prompt::{prompt_line, prompt_yes_no};
use crate::store::ConfigStore;

/// Resolve profiles for interactive mode; when nothing resolves and we are
/// on a terminal outside CI, offer to create a first profile instead of
/// failing.
pub(super) fn resolve_or_bootstrap(
    store: &ConfigStore,
    overrides: &CliOverrides,
) -> Result<Vec<ResolvedProfile>> {
    let opts = ResolveOptions {
        require_project: false,
    };
    let env = Env::from_process();
    let err = match resolve::resolve(overrides, &opts, &store.read_config(), &env) {
        Ok(profiles) => return Ok(profiles),
        Err(err) => err,
    };

    if !can_bootstrap(&env) {
        return Err(err.into());
    }
    println!("{}", err);
    match prompt_yes_no("set up a GitLab profile now?", true)? {
        Some(true) => {}
        _ => return Err(err.into()),
    }
    if !first_run(store)? {
        return Err(err.into());
    }

    resolve::resolve(overrides, &opts, &store.read_config(), &env).map_err(Into::into)
}

fn can_bootstrap(env: &Env) -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal() && env.get("CI").is_none()
}

/// Prompt for a first profile and persist it as the default. Returns false
/// when the user cancelled at any prompt.
fn first_run(store: &ConfigStore) -> Result<bool> {
    let Some(name) = prompt_line("profile name (empty for 'main')")? else {
        return Ok(false);
    };
    let name = if name.trim().is_empty() {
        "main".to_string()
    } else {
        name.trim().to_string()
    };

    let token = loop {
        let Some(token) = prompt_line("personal access token")? else {
            return Ok(false);
        };
        let token = token.trim().to_string();
        if !token.is_empty() {
            break token;
        }
        println!("a token is required");
    };

    let Some(base_url) = prompt_line(&format!("base URL (empty for {})", DEFAULT_BASE_URL))? else {
        return Ok(false);
    };
    let base_url = base_url.trim().to_string();

    let Some(project) = prompt_line("project id or namespace/path (optional)")? else {
        return Ok(false);
    };
    let project = project.trim().to_string();

    let stored = StoredProfile {
        token: Some(token),
        base_url: (!base_url.is_empty()).then_some(base_url),
        project_id: project
            .chars()
            .all(|c| c.is_ascii_digit())
            .then(|| project.clone())
            .filter(|p| !p.is_empty()),
        project_path: (!project.is_empty() && !project.chars().all(|c| c.is_ascii_digit()))
            .then_some(project),
        ..Default::default()
    };
    store.update_config(|cfg| {
        cfg.profiles.insert(name.clone(), stored);
        cfg.default_profile = Some(name.clone());
    })?;
    println!(
        "profile '{}' saved to {}",
        name,
        store.config_path().display()
    );
    Ok(true)
}
