use indexmap::IndexMap;

use crate::aggregate::{self, find_next_unread};
use crate::config::ViewPrefs;
use crate::display::DisplayState;
use crate::models::FolderId;
use crate::tree::FolderTree;

/// Headless state of the folder pane: the tree, the user's preferences, and
/// which folder is selected or opened in the message list.
#[derive(Debug, Clone, Default)]
pub struct FolderView {
    tree: FolderTree,
    prefs: ViewPrefs,
    selected: Option<FolderId>,
    opened: Option<FolderId>,
}

impl FolderView {
    pub fn new(tree: FolderTree, prefs: ViewPrefs) -> Self {
        FolderView {
            tree,
            prefs,
            selected: None,
            opened: None,
        }
    }

    pub fn tree(&self) -> &FolderTree {
        &self.tree
    }

    /// Direct access for structural edits. Changed folders must be marked
    /// dirty and picked up with [`update_all_updated`](Self::update_all_updated).
    pub fn tree_mut(&mut self) -> &mut FolderTree {
        &mut self.tree
    }

    pub fn prefs(&self) -> &ViewPrefs {
        &self.prefs
    }

    /// Swap preferences. Every row's label may change, so all rows go dirty.
    pub fn set_prefs(&mut self, prefs: ViewPrefs) {
        self.prefs = prefs;
        for id in self.tree.preorder() {
            self.tree.mark_dirty(id);
        }
    }

    // -- repaint -------------------------------------------------------------

    pub fn update_item(&mut self, id: FolderId) -> Vec<(FolderId, DisplayState)> {
        aggregate::update_row(&mut self.tree, id, &self.prefs)
    }

    pub fn update_all_updated(&mut self) -> IndexMap<FolderId, DisplayState> {
        aggregate::refresh_dirty(&mut self.tree, &self.prefs)
    }

    /// Full repaint in display order. Leaves the dirty set empty.
    pub fn rows(&mut self) -> Vec<(FolderId, DisplayState)> {
        self.tree.clear_all_dirty();
        self.tree
            .preorder()
            .into_iter()
            .filter_map(|id| {
                aggregate::display_state(&self.tree, id, &self.prefs).map(|s| (id, s))
            })
            .collect()
    }

    // -- tree events ---------------------------------------------------------

    /// Counters changed after a scan or fetch.
    pub fn set_counts(
        &mut self,
        id: FolderId,
        new: u32,
        unread: u32,
        total: u32,
    ) -> Vec<(FolderId, DisplayState)> {
        if !self.tree.set_counts(id, new, unread, total) {
            return Vec::new();
        }
        self.update_item(id)
    }

    pub fn row_expanded(&mut self, id: FolderId) -> Vec<(FolderId, DisplayState)> {
        if !self.tree.set_collapsed(id, false) {
            return Vec::new();
        }
        self.update_item(id)
    }

    pub fn row_collapsed(&mut self, id: FolderId) -> Vec<(FolderId, DisplayState)> {
        if !self.tree.set_collapsed(id, true) {
            return Vec::new();
        }
        self.update_item(id)
    }

    // -- selection -----------------------------------------------------------

    pub fn selected(&self) -> Option<FolderId> {
        self.selected
    }

    pub fn opened(&self) -> Option<FolderId> {
        self.opened
    }

    /// Select `id`; a selectable folder also becomes the opened one.
    pub fn select(&mut self, id: FolderId) -> bool {
        let Some(item) = self.tree.item(id) else {
            log::warn!("select: unknown folder {id:?}");
            return false;
        };
        self.selected = Some(id);
        if !item.no_select {
            self.opened = Some(id);
        }
        true
    }

    pub fn unselect(&mut self) {
        self.selected = None;
        self.opened = None;
    }

    pub fn set_opened(&mut self, id: Option<FolderId>) {
        self.opened = id.filter(|id| self.tree.contains(*id));
    }

    /// Move to the next folder with unread mail.
    ///
    /// The search starts after the opened folder, or after the first row when
    /// nothing is open, and wraps to the top once only when a folder is open.
    /// An opened folder that has since left the tree selects nothing.
    pub fn select_next_unread(&mut self) -> Option<FolderId> {
        let start = match self.opened {
            Some(id) if !self.tree.contains(id) => {
                log::warn!("select_next_unread: opened folder {id:?} is gone");
                self.opened = None;
                return None;
            }
            Some(id) => id,
            None => *self.tree.preorder().first()?,
        };

        let next = match find_next_unread(&self.tree, Some(start)) {
            Some(next) => next,
            None if self.opened.is_some() => find_next_unread(&self.tree, None)?,
            None => return None,
        };
        self.select(next);
        Some(next)
    }
}
