//! Derived presentation state for the folder tree.
//!
//! Every function here reads the tree and returns plain records; the only
//! write is clearing dirty entries in [`update_row`] and [`refresh_dirty`].

use indexmap::IndexMap;

use crate::config::ViewPrefs;
use crate::display::{
    base_label, counter_columns, counter_suffix, icons_for, DisplayState, Foreground,
};
use crate::models::{FolderId, FolderItem, SpecialFolder};
use crate::tree::FolderTree;

// ---------------------------------------------------------------------------
// Subtree predicates
// ---------------------------------------------------------------------------

/// True if any folder strictly below `node` has unread mail (or is a queue
/// holding messages). `None` searches every container root.
pub fn has_unread_descendant(tree: &FolderTree, node: Option<FolderId>) -> bool {
    search_children(tree, node, &FolderItem::has_unread)
}

/// True if any folder strictly below `node` has new mail (or is a queue
/// holding messages). `None` searches every container root.
pub fn has_new_descendant(tree: &FolderTree, node: Option<FolderId>) -> bool {
    search_children(tree, node, &FolderItem::has_new)
}

fn search_children(
    tree: &FolderTree,
    node: Option<FolderId>,
    hit: &dyn Fn(&FolderItem) -> bool,
) -> bool {
    let start = match node {
        Some(id) => tree.children(id),
        None => tree.roots(),
    };
    start.iter().any(|c| search_recursive(tree, *c, hit))
}

fn search_recursive(tree: &FolderTree, id: FolderId, hit: &dyn Fn(&FolderItem) -> bool) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    if hit(&node.item) {
        return true;
    }
    node.children().iter().any(|c| search_recursive(tree, *c, hit))
}

/// A folder whose children are hidden and hold unread mail gets a `+` marker.
pub fn add_unread_mark(tree: &FolderTree, id: FolderId) -> bool {
    tree.is_collapsed_in_view(id) && has_unread_descendant(tree, Some(id))
}

// ---------------------------------------------------------------------------
// Row state
// ---------------------------------------------------------------------------

/// Compute the row for `id` without touching the tree.
pub fn display_state(tree: &FolderTree, id: FolderId, prefs: &ViewPrefs) -> Option<DisplayState> {
    let Some(node) = tree.get(id) else {
        log::warn!("display_state: unknown folder {id:?}");
        return None;
    };
    let item = &node.item;
    let is_root = node.is_root();
    let collapsed = tree.is_collapsed_in_view(id);
    let mark = collapsed && has_unread_descendant(tree, Some(id));

    let mut label = base_label(item, is_root, prefs.ng_abbrev_len);
    if prefs.display_folder_unread {
        if let Some(suffix) = counter_suffix(item, mark) {
            label.push_str(&suffix);
        }
    }

    let (new_column, unread_column, total_column) = counter_columns(item, is_root);

    let (bold, color) = match item.stype {
        SpecialFolder::Outbox | SpecialFolder::Drafts | SpecialFolder::Trash => (false, false),
        SpecialFolder::Queue => (item.total > 0, item.total > 0),
        _ => (
            item.unread > 0 || mark,
            item.new > 0 || (mark && has_new_descendant(tree, Some(id))),
        ),
    };

    let foreground = if item.no_select {
        Foreground::NoSelect
    } else if color {
        Foreground::New
    } else {
        Foreground::Default
    };

    let (icon, open_icon) = icons_for(item);

    Some(DisplayState {
        label,
        new_column,
        unread_column,
        total_column,
        icon,
        open_icon,
        bold,
        color,
        foreground,
        add_unread_mark: mark,
        expanded: !collapsed && !node.children().is_empty(),
    })
}

/// Rows of the collapsed ancestors that must repaint after `id` changed.
///
/// Walks upward from the parent of `id` while ancestors hide their children
/// and stops at the first expanded one: an expanded folder shows its children
/// directly and carries no aggregate marker. A folder left expanded under a
/// collapsed ancestor is hidden, so the walk continues through it.
pub fn recompute_ancestor_chain(
    tree: &FolderTree,
    id: FolderId,
    prefs: &ViewPrefs,
) -> Vec<(FolderId, DisplayState)> {
    let mut out = Vec::new();
    let mut cur = tree.parent(id);
    while let Some(p) = cur {
        if !tree.is_collapsed_in_view(p) {
            break;
        }
        if let Some(state) = display_state(tree, p, prefs) {
            out.push((p, state));
        }
        cur = tree.parent(p);
    }
    out
}

/// Recompute `id` and its collapsed ancestors, clearing their dirty entries.
///
/// The first element is always the row for `id`; the result is empty only
/// when `id` is not in the tree.
pub fn update_row(
    tree: &mut FolderTree,
    id: FolderId,
    prefs: &ViewPrefs,
) -> Vec<(FolderId, DisplayState)> {
    let Some(state) = display_state(tree, id, prefs) else {
        return Vec::new();
    };
    let mut rows = vec![(id, state)];
    rows.extend(recompute_ancestor_chain(tree, id, prefs));
    for (fid, _) in &rows {
        tree.clear_dirty(*fid);
    }
    log::debug!("update_row: {id:?} repainted {} row(s)", rows.len());
    rows
}

/// Recompute every folder marked dirty since the last refresh.
///
/// Folders are visited in display order; when an ancestor is repainted more
/// than once, the last computed state is kept.
pub fn refresh_dirty(
    tree: &mut FolderTree,
    prefs: &ViewPrefs,
) -> IndexMap<FolderId, DisplayState> {
    let mut out = IndexMap::new();
    for id in tree.take_dirty() {
        if let Some(item) = tree.item(id) {
            let label = item.path.as_deref().unwrap_or(&item.name);
            log::debug!("refresh_dirty: {label:?} is updated");
        }
        for (fid, state) in update_row(tree, id, prefs) {
            out.insert(fid, state);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Next folder in display order after `after` holding unread mail.
///
/// Trash is skipped. With `after == None` the search starts at the first row.
pub fn find_next_unread(tree: &FolderTree, after: Option<FolderId>) -> Option<FolderId> {
    let order = tree.preorder();
    let start = match after {
        Some(id) => match order.iter().position(|x| *x == id) {
            Some(pos) => pos + 1,
            None => {
                log::warn!("find_next_unread: unknown folder {id:?}");
                return None;
            }
        },
        None => 0,
    };
    order[start..].iter().copied().find(|id| {
        tree.item(*id)
            .is_some_and(|item| item.unread > 0 && item.stype != SpecialFolder::Trash)
    })
}
