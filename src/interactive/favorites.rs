use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use anyhow::Result;

use crate::select::SelectorHooks;
use crate::store::ConfigStore;

use super::ProjectChoice;

/// Favorite-toggle capability handed to the paged selector. Failures are
/// collected and printed after the selector releases the terminal.
pub(super) struct FavoriteHooks<'a> {
    store: &'a ConfigStore,
    keys: Rc<RefCell<HashSet<String>>>,
    warnings: Vec<String>,
}

impl<'a> FavoriteHooks<'a> {
    pub fn new(store: &'a ConfigStore, keys: Rc<RefCell<HashSet<String>>>) -> Self {
        Self {
            store,
            keys,
            warnings: Vec::new(),
        }
    }

    /// Print collected warnings once the selector has restored the
    /// terminal; printing mid-frame would tear the raw-mode redraw.
    pub fn flush_warnings(&mut self) {
        for warning in self.warnings.drain(..) {
            eprintln!("{}", warning);
        }
    }
}

impl SelectorHooks<ProjectChoice> for FavoriteHooks<'_> {
    fn toggle_favorite(&mut self, item: &ProjectChoice) -> Result<()> {
        let now_favorite = self.store.toggle_favorite(&item.favorite_record())?;
        let mut keys = self.keys.borrow_mut();
        if now_favorite {
            keys.insert(item.key());
        } else {
            keys.remove(&item.key());
        }
        Ok(())
    }

    fn notify_failure(&mut self, what: &str, err: &anyhow::Error) {
        self.warnings.push(format!("warning: {} failed: {:#}", what, err));
    }
}
