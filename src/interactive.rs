//! Interactive mode: a single long-lived loop over
//! { list mode -> project -> action -> merge request -> parameters }.
//!
//! Session state is an explicit struct threaded through the loop functions;
//! cancelling a prompt returns to the nearest enclosing menu, and only
//! cancelling the top-level mode prompt ends the session.

use anyhow::Result;

use crate::model::CliOverrides;
use crate::remote::GitlabClient;
use crate::select::PagedSelector;
use crate::store::ConfigStore;

mod actions;
mod bootstrap;
mod discovery;
mod favorites;
mod profiles;
mod session;

pub use self::discovery::ProjectChoice;
use self::session::Session;

/// Signal bubbled up from inner menus: keep looping, or end the whole
/// session (the explicit "exit" action).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

#[derive(Clone, Copy)]
enum ListMode {
    All,
    Favorites,
    ManageProfiles,
    Cancel,
}

const LIST_MODES: [(ListMode, &str); 4] = [
    (ListMode::All, "All projects"),
    (ListMode::Favorites, "Favorite projects"),
    (ListMode::ManageProfiles, "Manage profiles"),
    (ListMode::Cancel, "Cancel"),
];

pub fn run(overrides: &CliOverrides) -> Result<()> {
    let store = ConfigStore::open()?;
    let resolved = bootstrap::resolve_or_bootstrap(&store, overrides)?;

    let mut clients = Vec::with_capacity(resolved.len());
    for profile in resolved {
        clients.push(GitlabClient::new(profile)?);
    }
    let mut session = Session::new(store, clients);

    loop {
        let picked = PagedSelector::new(&LIST_MODES, |(_, label)| vec![label.to_string()]).run()?;
        let mode = match picked {
            None => break,
            Some(i) => LIST_MODES[i].0,
        };
        match mode {
            ListMode::Cancel => break,
            ListMode::ManageProfiles => profiles::manage(&session.store)?,
            ListMode::All | ListMode::Favorites => {
                let favorites_only = matches!(mode, ListMode::Favorites);
                if discovery::browse(&mut session, favorites_only)? == Flow::Exit {
                    break;
                }
            }
        }
    }
    Ok(())
}
