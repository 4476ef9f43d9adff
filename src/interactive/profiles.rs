use anyhow::Result;

use crate::model::StoredProfile;
use crate::select::PagedSelector;
use crate::select::prompt::prompt_yes_no;
use crate::store::ConfigStore;

/// Profile management submenu: pick a profile, then set it as default or
/// remove it. All writes go through the store's read-modify-write path so
/// other profile entries stay intact.
pub(super) fn manage(store: &ConfigStore) -> Result<()> {
    loop {
        let cfg = store.read_global_config();
        if cfg.profiles.is_empty() {
            println!("no profiles configured");
            return Ok(());
        }

        let entries: Vec<(String, StoredProfile)> = cfg
            .profiles
            .iter()
            .map(|(name, p)| (name.clone(), p.clone()))
            .collect();
        let default = cfg.default_profile.clone();

        let picked = PagedSelector::new(&entries, |(name, profile)| {
            let marker = if default.as_deref() == Some(name.as_str()) {
                "*"
            } else {
                " "
            };
            let project = profile
                .project_id
                .as_deref()
                .or(profile.project_path.as_deref())
                .unwrap_or("-");
            vec![format!("{} {}  ({})", marker, name, project)]
        })
        .run()?;
        let Some(index) = picked else {
            return Ok(());
        };
        let name = entries[index].0.clone();

        const PROFILE_ACTIONS: [&str; 3] = ["Set as default", "Remove", "Back"];
        let action = PagedSelector::new(&PROFILE_ACTIONS, |label| vec![label.to_string()]).run()?;
        match action {
            Some(0) => {
                store.update_config(|cfg| cfg.default_profile = Some(name.clone()))?;
                println!("default profile is now '{}'", name);
            }
            Some(1) => {
                let Some(true) = prompt_yes_no(&format!("remove profile '{}'?", name), false)?
                else {
                    continue;
                };
                store.update_config(|cfg| {
                    cfg.profiles.remove(&name);
                    if cfg.default_profile.as_deref() == Some(name.as_str()) {
                        cfg.default_profile = None;
                    }
                })?;
                println!("removed profile '{}'", name);
            }
            _ => {}
        }
    }
}
