use indexmap::{IndexMap, IndexSet};

use crate::models::{FolderId, FolderItem};

// ---------------------------------------------------------------------------
// FolderNode — one folder plus its links
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FolderNode {
    pub item: FolderItem,
    parent: Option<FolderId>,
    children: Vec<FolderId>,
}

impl FolderNode {
    pub fn parent(&self) -> Option<FolderId> {
        self.parent
    }

    pub fn children(&self) -> &[FolderId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

// ---------------------------------------------------------------------------
// FolderTree — arena of folders with explicit dirty tracking
// ---------------------------------------------------------------------------

/// The mailbox hierarchy shown in the folder pane.
///
/// Nodes whose presentation is stale are kept in a dirty set instead of a
/// per-item flag; [`take_dirty`](Self::take_dirty) hands them to the refresh
/// pass.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    nodes: IndexMap<FolderId, FolderNode>,
    roots: Vec<FolderId>,
    dirty: IndexSet<FolderId>,
    next_id: u64,
}

impl FolderTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: FolderId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn alloc_id(&mut self) -> FolderId {
        let id = FolderId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a top-level folder (a mailbox container's root node).
    pub fn add_root(&mut self, item: FolderItem) -> FolderId {
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            FolderNode {
                item,
                parent: None,
                children: Vec::new(),
            },
        );
        self.roots.push(id);
        self.dirty.insert(id);
        id
    }

    /// Append `item` as the last child of `parent`.
    pub fn add_child(&mut self, parent: FolderId, item: FolderItem) -> Option<FolderId> {
        if !self.nodes.contains_key(&parent) {
            log::warn!("add_child: unknown parent {parent:?} for folder {:?}", item.name);
            return None;
        }
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            FolderNode {
                item,
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        self.dirty.insert(id);
        Some(id)
    }

    /// Remove `id` and everything below it. Returns the number of nodes dropped.
    pub fn remove(&mut self, id: FolderId) -> usize {
        let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else {
            log::warn!("remove: unknown folder {id:?}");
            return 0;
        };
        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.retain(|c| *c != id);
                }
                // The parent's aggregate marker may change.
                self.dirty.insert(parent);
            }
            None => self.roots.retain(|r| *r != id),
        }

        let doomed = self.subtree(id);
        for d in &doomed {
            self.nodes.shift_remove(d);
            self.dirty.shift_remove(d);
        }
        doomed.len()
    }

    pub fn get(&self, id: FolderId) -> Option<&FolderNode> {
        self.nodes.get(&id)
    }

    pub fn item(&self, id: FolderId) -> Option<&FolderItem> {
        self.nodes.get(&id).map(|n| &n.item)
    }

    /// Mutable access to a folder. Callers that change counters or collapse
    /// state this way must call [`mark_dirty`](Self::mark_dirty) themselves.
    pub fn item_mut(&mut self, id: FolderId) -> Option<&mut FolderItem> {
        self.nodes.get_mut(&id).map(|n| &mut n.item)
    }

    pub fn parent(&self, id: FolderId) -> Option<FolderId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: FolderId) -> &[FolderId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[FolderId] {
        &self.roots
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: FolderId) -> Vec<FolderId> {
        let mut out = Vec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent(p);
        }
        out
    }

    /// Whether the folder pane hides the children of `id`: either the folder
    /// itself is collapsed or it sits under a collapsed ancestor. A folder
    /// keeps its own `collapsed == false` while an ancestor hides it.
    pub fn is_collapsed_in_view(&self, id: FolderId) -> bool {
        let Some(item) = self.item(id) else {
            return false;
        };
        item.collapsed
            || self
                .ancestors(id)
                .into_iter()
                .any(|a| self.item(a).is_some_and(|i| i.collapsed))
    }

    /// `id` and all of its descendants, in pre-order.
    pub fn subtree(&self, id: FolderId) -> Vec<FolderId> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }
        self.walk(&[id])
    }

    /// Every folder in display order: roots as inserted, children in order.
    pub fn preorder(&self) -> Vec<FolderId> {
        self.walk(&self.roots)
    }

    fn walk(&self, start: &[FolderId]) -> Vec<FolderId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<FolderId> = start.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Find a folder by its storage path.
    pub fn find_by_path(&self, path: &str) -> Option<FolderId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.item.path.as_deref() == Some(path))
            .map(|(id, _)| *id)
    }

    // -- mutations that invalidate presentation ------------------------------

    pub fn set_counts(&mut self, id: FolderId, new: u32, unread: u32, total: u32) -> bool {
        let Some(item) = self.item_mut(id) else {
            log::warn!("set_counts: unknown folder {id:?}");
            return false;
        };
        item.new = new;
        item.unread = unread;
        item.total = total;
        self.dirty.insert(id);
        true
    }

    pub fn set_collapsed(&mut self, id: FolderId, collapsed: bool) -> bool {
        let Some(item) = self.item_mut(id) else {
            log::warn!("set_collapsed: unknown folder {id:?}");
            return false;
        };
        item.collapsed = collapsed;
        self.dirty.insert(id);
        true
    }

    pub fn rename(&mut self, id: FolderId, name: impl Into<String>) -> bool {
        let Some(item) = self.item_mut(id) else {
            log::warn!("rename: unknown folder {id:?}");
            return false;
        };
        item.name = name.into();
        self.dirty.insert(id);
        true
    }

    // -- dirty set -----------------------------------------------------------

    pub fn mark_dirty(&mut self, id: FolderId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        self.dirty.insert(id);
        true
    }

    pub fn is_dirty(&self, id: FolderId) -> bool {
        self.dirty.contains(&id)
    }

    pub fn clear_dirty(&mut self, id: FolderId) {
        self.dirty.shift_remove(&id);
    }

    pub fn clear_all_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Drain the dirty set, returning the stale folders in display order.
    pub fn take_dirty(&mut self) -> Vec<FolderId> {
        if self.dirty.is_empty() {
            return Vec::new();
        }
        let dirty = std::mem::take(&mut self.dirty);
        self.preorder()
            .into_iter()
            .filter(|id| dirty.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FolderKind;

    fn folder(name: &str) -> FolderItem {
        FolderItem::new(name, FolderKind::Local).with_path(name)
    }

    /// mail ─┬─ inbox ── lists
    ///       └─ work
    /// news
    fn sample() -> (FolderTree, [FolderId; 5]) {
        let mut t = FolderTree::new();
        let mail = t.add_root(folder("mail"));
        let inbox = t.add_child(mail, folder("inbox")).expect("inbox");
        let lists = t.add_child(inbox, folder("lists")).expect("lists");
        let work = t.add_child(mail, folder("work")).expect("work");
        let news = t.add_root(folder("news"));
        (t, [mail, inbox, lists, work, news])
    }

    #[test]
    fn preorder_follows_display_order() {
        let (t, [mail, inbox, lists, work, news]) = sample();
        assert_eq!(t.preorder(), vec![mail, inbox, lists, work, news]);
        assert_eq!(t.subtree(inbox), vec![inbox, lists]);
    }

    #[test]
    fn ancestors_nearest_first() {
        let (t, [mail, inbox, lists, _, _]) = sample();
        assert_eq!(t.ancestors(lists), vec![inbox, mail]);
        assert!(t.ancestors(mail).is_empty());
    }

    #[test]
    fn add_child_to_unknown_parent_is_rejected() {
        let (mut t, _) = sample();
        assert!(t.add_child(FolderId(999), folder("orphan")).is_none());
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn remove_drops_subtree_and_dirties_parent() {
        let (mut t, [mail, inbox, lists, work, news]) = sample();
        t.clear_all_dirty();

        assert_eq!(t.remove(inbox), 2);
        assert!(!t.contains(inbox));
        assert!(!t.contains(lists));
        assert_eq!(t.children(mail), &[work]);
        assert!(t.is_dirty(mail));

        assert_eq!(t.remove(news), 1);
        assert_eq!(t.roots(), &[mail]);
        assert_eq!(t.remove(news), 0);
    }

    #[test]
    fn take_dirty_returns_display_order_and_empties_set() {
        let (mut t, [mail, _, lists, work, _]) = sample();
        t.clear_all_dirty();

        t.set_counts(work, 1, 1, 1);
        t.set_collapsed(mail, true);
        t.rename(lists, "mailing-lists");

        assert_eq!(t.take_dirty(), vec![mail, lists, work]);
        assert!(t.take_dirty().is_empty());
    }

    #[test]
    fn mutations_on_unknown_ids_report_false() {
        let (mut t, _) = sample();
        assert!(!t.set_counts(FolderId(42), 1, 1, 1));
        assert!(!t.set_collapsed(FolderId(42), true));
        assert!(!t.mark_dirty(FolderId(42)));
    }

    #[test]
    fn hidden_folder_counts_as_collapsed_in_view() {
        let (mut t, [mail, inbox, lists, work, news]) = sample();
        assert!(!t.is_collapsed_in_view(inbox));

        t.set_collapsed(mail, true);
        assert!(t.is_collapsed_in_view(mail));
        assert!(t.is_collapsed_in_view(inbox));
        assert!(t.is_collapsed_in_view(lists));
        assert!(t.is_collapsed_in_view(work));
        assert!(!t.item(inbox).expect("inbox").collapsed);
        assert!(!t.is_collapsed_in_view(news));
        assert!(!t.is_collapsed_in_view(FolderId(999)));
    }

    #[test]
    fn find_by_path_locates_folder() {
        let (t, [_, _, lists, _, _]) = sample();
        assert_eq!(t.find_by_path("lists"), Some(lists));
        assert_eq!(t.find_by_path("nope"), None);
    }
}
