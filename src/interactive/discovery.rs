use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::OnceLock;

use anyhow::Result;
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;

use crate::model::{FavoriteProjectRecord, favorite_key};
use crate::remote::{GitlabClient, Project};
use crate::select::PagedSelector;
use crate::store::ConfigStore;

use super::favorites::FavoriteHooks;
use super::session::Session;
use super::{Flow, actions};

/// A selectable project: live GitLab data (or a favorites record) merged
/// with favorite membership. In-memory only.
#[derive(Clone, Debug)]
pub struct ProjectChoice {
    pub profile: Option<String>,
    pub project_ref: String,
    pub label: String,
    pub web_url: Option<String>,
    pub last_activity: Option<String>,
}

impl ProjectChoice {
    pub fn key(&self) -> String {
        favorite_key(self.profile.as_deref(), &self.project_ref)
    }

    pub fn favorite_record(&self) -> FavoriteProjectRecord {
        FavoriteProjectRecord {
            project_ref: self.project_ref.clone(),
            profile: self.profile.clone(),
            label: Some(self.label.clone()),
            web_url: self.web_url.clone(),
            last_activity: self.last_activity.clone(),
        }
    }

    fn from_project(profile: Option<&str>, project: &Project) -> Self {
        Self {
            profile: profile.map(str::to_string),
            project_ref: project.id.to_string(),
            label: project.path_with_namespace.clone(),
            web_url: project.web_url.clone(),
            last_activity: project.last_activity_at.clone(),
        }
    }

    fn from_favorite(record: &FavoriteProjectRecord) -> Self {
        Self {
            profile: record.profile.clone(),
            project_ref: record.project_ref.clone(),
            label: record
                .label
                .clone()
                .unwrap_or_else(|| record.project_ref.clone()),
            web_url: record.web_url.clone(),
            last_activity: record.last_activity.clone(),
        }
    }
}

/// Project-selection loop for one list mode. Escape at the project list
/// returns to the mode menu; "back" from the action menu returns here.
pub(super) fn browse(session: &mut Session, favorites_only: bool) -> Result<Flow> {
    let choices = if favorites_only {
        favorite_choices(&session.store)
    } else {
        discover_projects(session)
    };
    if choices.is_empty() {
        println!("no projects found");
        return Ok(Flow::Continue);
    }

    let favorite_keys: Rc<RefCell<HashSet<String>>> = Rc::new(RefCell::new(
        session
            .store
            .read_favorites()
            .iter()
            .map(FavoriteProjectRecord::key)
            .collect(),
    ));
    let many_profiles = session.clients.len() > 1;

    loop {
        let mut hooks = FavoriteHooks::new(&session.store, favorite_keys.clone());
        let keys_for_fmt = favorite_keys.clone();
        let format = move |choice: &ProjectChoice| {
            format_choice(choice, &keys_for_fmt.borrow(), many_profiles)
        };

        let picked = PagedSelector::new(&choices, format)
            .hooks(&mut hooks)
            .run()?;
        hooks.flush_warnings();
        let Some(index) = picked else {
            return Ok(Flow::Continue);
        };

        match actions::action_loop(session, &choices[index], &favorite_keys)? {
            Flow::Exit => return Ok(Flow::Exit),
            Flow::Continue => {}
        }
    }
}

/// Fan project listing out across all session profiles at once; a failing
/// profile logs a warning and contributes no choices.
fn discover_projects(session: &Session) -> Vec<ProjectChoice> {
    let results: Vec<Result<Vec<Project>>> = std::thread::scope(|scope| {
        let handles: Vec<_> = session
            .clients
            .iter()
            .map(|client| scope.spawn(move || client.list_projects()))
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(res) => res,
                Err(_) => Err(anyhow::anyhow!("project listing panicked")),
            })
            .collect()
    });

    let mut choices = Vec::new();
    for (client, result) in session.clients.iter().zip(results) {
        let profile = client.profile().name.as_deref();
        match result {
            Ok(projects) => {
                choices.extend(
                    projects
                        .iter()
                        .map(|p| ProjectChoice::from_project(profile, p)),
                );
            }
            Err(err) => {
                eprintln!(
                    "warning: profile '{}': {:#}",
                    profile.unwrap_or("default"),
                    err
                );
            }
        }
    }
    choices
}

fn favorite_choices(store: &ConfigStore) -> Vec<ProjectChoice> {
    store
        .read_favorites()
        .iter()
        .map(ProjectChoice::from_favorite)
        .collect()
}

fn format_choice(
    choice: &ProjectChoice,
    favorite_keys: &HashSet<String>,
    many_profiles: bool,
) -> Vec<String> {
    let star = if favorite_keys.contains(&choice.key()) {
        "*"
    } else {
        " "
    };
    let mut first = format!("{} {}", star, choice.label);
    if many_profiles || choice.profile.is_some() {
        first.push_str(&format!(
            " ({})",
            choice.profile.as_deref().unwrap_or("default")
        ));
    }

    let mut detail = Vec::new();
    if let Some(url) = choice.web_url.as_deref() {
        detail.push(url.to_string());
    }
    if let Some(date) = choice.last_activity.as_deref().and_then(short_date) {
        detail.push(format!("active {}", date));
    }

    if detail.is_empty() {
        vec![first]
    } else {
        vec![first, detail.join("  ")]
    }
}

fn date_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse("[year]-[month]-[day]").expect("valid time format")
    })
}

fn short_date(ts: &str) -> Option<String> {
    let dt = OffsetDateTime::parse(ts, &Rfc3339).ok()?;
    dt.format(date_format()).ok()
}
