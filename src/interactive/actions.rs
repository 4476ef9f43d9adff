use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use anyhow::Result;

use crate::remote::{GitlabClient, MergeRequest, post_comment_verified};
use crate::select::prompt::{prompt_line, prompt_yes_no};
use crate::select::PagedSelector;

use super::session::Session;
use super::{Flow, ProjectChoice};

#[derive(Clone, Copy)]
enum Action {
    Comment,
    Merge,
    ToggleFavorite,
    Back,
    Exit,
}

const ACTIONS: [(Action, &str); 5] = [
    (Action::Comment, "Comment on a merge request"),
    (Action::Merge, "Merge a merge request"),
    (Action::ToggleFavorite, "Toggle favorite"),
    (Action::Back, "Back to projects"),
    (Action::Exit, "Exit"),
];

/// Action menu for one chosen project. `Continue` sends the caller back to
/// the project list; `Exit` ends the session.
pub(super) fn action_loop(
    session: &mut Session,
    choice: &ProjectChoice,
    favorite_keys: &Rc<RefCell<HashSet<String>>>,
) -> Result<Flow> {
    // Favorites can carry a profile not resolved this run; that is a
    // bad pick, not a reason to end the session.
    let client = match session.client_for(choice) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("warning: {:#}", err);
            return Ok(Flow::Continue);
        }
    };
    loop {
        println!("{}", choice.label);
        let picked = PagedSelector::new(&ACTIONS, |(_, label)| vec![label.to_string()]).run()?;
        let action = match picked {
            None => return Ok(Flow::Continue),
            Some(i) => ACTIONS[i].0,
        };
        match action {
            Action::Back => return Ok(Flow::Continue),
            Action::Exit => return Ok(Flow::Exit),
            Action::Comment => {
                if let Err(err) = comment_flow(&client) {
                    eprintln!("warning: comment failed: {:#}", err);
                }
            }
            Action::Merge => {
                if let Err(err) = merge_flow(&client) {
                    eprintln!("warning: merge failed: {:#}", err);
                }
            }
            Action::ToggleFavorite => {
                match session.store.toggle_favorite(&choice.favorite_record()) {
                    Ok(true) => {
                        favorite_keys.borrow_mut().insert(choice.key());
                        println!("added '{}' to favorites", choice.label);
                    }
                    Ok(false) => {
                        favorite_keys.borrow_mut().remove(&choice.key());
                        println!("removed '{}' from favorites", choice.label);
                    }
                    Err(err) => eprintln!("warning: toggle favorite failed: {:#}", err),
                }
            }
        }
    }
}

fn comment_flow(client: &GitlabClient) -> Result<()> {
    let Some(mr) = pick_merge_request(client)? else {
        return Ok(());
    };
    let Some(iid) = mr.iid else {
        return Ok(());
    };
    let Some(body) = prompt_line("comment body")? else {
        return Ok(());
    };
    if body.trim().is_empty() {
        println!("empty comment, nothing posted");
        return Ok(());
    }
    post_comment_verified(client, iid, body.trim())?;
    println!("commented on !{}", iid);
    Ok(())
}

fn merge_flow(client: &GitlabClient) -> Result<()> {
    let Some(mr) = pick_merge_request(client)? else {
        return Ok(());
    };
    let Some(iid) = mr.iid else {
        return Ok(());
    };
    let Some(true) = prompt_yes_no(&format!("merge !{} '{}'?", iid, mr.title), false)? else {
        println!("merge skipped");
        return Ok(());
    };
    let merged = client.merge(iid)?;
    println!("merged !{} ({})", iid, merged.state);
    Ok(())
}

/// Pick one mergeable merge request, or `None` when there are none or the
/// user cancelled.
fn pick_merge_request(client: &GitlabClient) -> Result<Option<MergeRequest>> {
    let all = client.list_merge_requests(Some("opened"))?;
    let candidates: Vec<MergeRequest> = all
        .into_iter()
        .filter(MergeRequest::is_merge_candidate)
        .collect();
    if candidates.is_empty() {
        println!("no mergeable merge requests");
        return Ok(None);
    }

    let picked = PagedSelector::new(&candidates, |mr: &MergeRequest| {
        let iid = mr.iid.map(|i| format!("!{}", i)).unwrap_or_default();
        let author = mr
            .author
            .as_ref()
            .and_then(|a| a.username.as_deref())
            .unwrap_or("unknown");
        vec![
            format!("{} {}", iid, mr.title),
            format!("{}  by {}", mr.branches(), author),
        ]
    })
    .run()?;
    Ok(picked.map(|i| candidates[i].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConfigStore;

    #[test]
    fn unmatched_favorite_profile_returns_to_project_list() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let store = ConfigStore::at(tmp.path().join("mrq"), tmp.path().join(".mrq.json"));
        let mut session = Session::new(store, Vec::new());

        let choice = ProjectChoice {
            profile: Some("ghost".into()),
            project_ref: "42".into(),
            label: "group/app".into(),
            web_url: None,
            last_activity: None,
        };
        let keys = Rc::new(RefCell::new(HashSet::new()));

        // No client matches the stored profile; the loop must hand control
        // back to the project list instead of erroring out.
        assert_eq!(action_loop(&mut session, &choice, &keys)?, Flow::Continue);
        Ok(())
    }
}
