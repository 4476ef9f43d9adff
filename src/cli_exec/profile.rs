use anyhow::{Context, Result, bail};

use mrq::model::StoredProfile;
use mrq::store::ConfigStore;

use crate::cli_commands::profile::{AddArgs, ProfileCommands};

pub(super) fn handle_profile_command(command: ProfileCommands) -> Result<()> {
    let store = ConfigStore::open()?;
    match command {
        ProfileCommands::Add(args) => handle_add(&store, args),
        ProfileCommands::List { json } => handle_list(&store, json),
        ProfileCommands::Remove { name } => handle_remove(&store, &name),
        ProfileCommands::Default { name } => handle_default(&store, &name),
    }
}

fn handle_add(store: &ConfigStore, args: AddArgs) -> Result<()> {
    let name = args.name.trim().to_string();
    if name.is_empty() {
        bail!("profile name is empty");
    }
    let token = args.token.trim().to_string();
    if token.is_empty() {
        bail!("token is empty");
    }

    store.update_config(|cfg| {
        let first = cfg.profiles.is_empty();
        cfg.profiles.insert(
            name.clone(),
            StoredProfile {
                base_url: args.base_url.clone(),
                token: Some(token.clone()),
                project_id: args.project_id.clone(),
                project_path: args.project_path.clone(),
                display_name: args.display_name.clone(),
                email: args.email.clone(),
                username: args.username.clone(),
            },
        );
        if args.default || first {
            cfg.default_profile = Some(name.clone());
        }
    })?;
    println!("saved profile '{}' to {}", name, store.config_path().display());
    Ok(())
}

fn handle_list(store: &ConfigStore, json: bool) -> Result<()> {
    let cfg = store.read_global_config();
    if json {
        // Tokens stay out of listings.
        let entries: Vec<serde_json::Value> = cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                serde_json::json!({
                    "name": name,
                    "default": cfg.default_profile.as_deref() == Some(name.as_str()),
                    "baseUrl": p.base_url,
                    "projectId": p.project_id,
                    "projectPath": p.project_path,
                    "displayName": p.display_name,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).context("serialize profile list")?
        );
        return Ok(());
    }

    if cfg.profiles.is_empty() {
        println!("no profiles configured");
        return Ok(());
    }
    for (name, p) in &cfg.profiles {
        let marker = if cfg.default_profile.as_deref() == Some(name.as_str()) {
            "*"
        } else {
            " "
        };
        let project = p
            .project_id
            .as_deref()
            .or(p.project_path.as_deref())
            .unwrap_or("-");
        let base = p.base_url.as_deref().unwrap_or("gitlab.com");
        println!("{} {}  {}  {}", marker, name, base, project);
    }
    Ok(())
}

fn handle_remove(store: &ConfigStore, name: &str) -> Result<()> {
    let cfg = store.read_global_config();
    if !cfg.profiles.contains_key(name) {
        bail!("no profile named '{}'", name);
    }
    store.update_config(|cfg| {
        cfg.profiles.remove(name);
        if cfg.default_profile.as_deref() == Some(name) {
            cfg.default_profile = None;
        }
    })?;
    println!("removed profile '{}'", name);
    Ok(())
}

fn handle_default(store: &ConfigStore, name: &str) -> Result<()> {
    let cfg = store.read_global_config();
    if !cfg.profiles.contains_key(name) {
        bail!("no profile named '{}'", name);
    }
    store.update_config(|cfg| {
        cfg.default_profile = Some(name.to_string());
    })?;
    println!("default profile is now '{}'", name);
    Ok(())
}
