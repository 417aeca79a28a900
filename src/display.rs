use serde::{Deserialize, Serialize};

use crate::models::{FolderItem, FolderKind, SpecialFolder};

/// Icon slot a row uses. The toolkit layer maps these to its own pixbufs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FolderIcon {
    Inbox,
    /// Shared by the sent and queue folders.
    Outbox,
    Trash,
    FolderClosed,
    FolderOpen,
    NoSelect,
}

/// Text colour selection for a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Foreground {
    #[default]
    Default,
    /// Folder (or its hidden children) holds new mail.
    New,
    /// Placeholder node that cannot be opened.
    NoSelect,
}

/// Everything the folder pane needs to draw one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub label: String,
    pub new_column: String,
    pub unread_column: String,
    pub total_column: String,
    pub icon: FolderIcon,
    pub open_icon: FolderIcon,
    pub bold: bool,
    pub color: bool,
    pub foreground: Foreground,
    pub add_unread_mark: bool,
    pub expanded: bool,
}

impl DisplayState {
    /// Icon to draw right now, given whether the row is showing its children.
    pub fn current_icon(&self) -> FolderIcon {
        if self.expanded {
            self.open_icon
        } else {
            self.icon
        }
    }
}

/// Closed/open icon pair for a folder.
pub fn icons_for(item: &FolderItem) -> (FolderIcon, FolderIcon) {
    match item.stype {
        SpecialFolder::Inbox => (FolderIcon::Inbox, FolderIcon::Inbox),
        SpecialFolder::Outbox | SpecialFolder::Queue => (FolderIcon::Outbox, FolderIcon::Outbox),
        SpecialFolder::Trash => (FolderIcon::Trash, FolderIcon::Trash),
        SpecialFolder::Drafts => (FolderIcon::FolderClosed, FolderIcon::FolderOpen),
        SpecialFolder::Normal if item.no_select => (FolderIcon::NoSelect, FolderIcon::NoSelect),
        SpecialFolder::Normal => (FolderIcon::FolderClosed, FolderIcon::FolderOpen),
    }
}

/// Label before any counter suffix.
///
/// Special folders on local storage get their canonical label only while
/// they still live at the default path; a renamed one keeps its own name.
pub fn base_label(item: &FolderItem, is_root: bool, ng_abbrev_len: usize) -> String {
    if item.stype != SpecialFolder::Normal {
        let at_default = item.kind.is_local()
            && item.path.is_some()
            && item.path.as_deref() == item.stype.default_path();
        return match item.stype.canonical_label() {
            Some(label) if at_default => label.to_string(),
            _ => item.name.clone(),
        };
    }

    if is_root {
        return format!("{}{}", item.name, item.kind.protocol_tag());
    }

    match (&item.kind, &item.path) {
        (FolderKind::News, Some(path)) if *path == item.name => {
            abbrev_newsgroup_name(path, ng_abbrev_len)
        }
        _ => item.name.clone(),
    }
}

/// Counter suffix appended to the label, e.g. `" (5)"`, `" (5+)"`, `" (+)"`.
///
/// A queue with pending messages shows its total instead of its unread count.
pub fn counter_suffix(item: &FolderItem, add_unread_mark: bool) -> Option<String> {
    let plus = if add_unread_mark { "+" } else { "" };
    if item.is_pending_queue() {
        return Some(format!(" ({}{plus})", item.total));
    }
    if item.unread > 0 {
        Some(format!(" ({}{plus})", item.unread))
    } else if add_unread_mark {
        Some(" (+)".to_string())
    } else {
        None
    }
}

/// New/unread/total column text. Container roots aggregate nothing and show `-`.
pub fn counter_columns(item: &FolderItem, is_root: bool) -> (String, String, String) {
    if is_root {
        return ("-".into(), "-".into(), "-".into());
    }
    (
        item.new.to_string(),
        item.unread.to_string(),
        item.total.to_string(),
    )
}

/// Shorten a dotted newsgroup name to at most `max_len` characters by
/// reducing leading components to their first letter.
///
/// The last component is never shortened, so the result may still exceed
/// `max_len`: `comp.lang.c.moderated` at 16 becomes `c.l.c.moderated`.
pub fn abbrev_newsgroup_name(group: &str, max_len: usize) -> String {
    let chars: Vec<char> = group.chars().collect();
    let mut out = String::with_capacity(group.len());
    let mut out_len = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        while i < chars.len() && chars[i] == '.' {
            out.push('.');
            out_len += 1;
            i += 1;
        }
        if i >= chars.len() {
            break;
        }
        let rest = &chars[i..];
        if out_len + rest.len() > max_len && rest.contains(&'.') {
            out.push(chars[i]);
            out_len += 1;
            i += 1;
            while i < chars.len() && chars[i] != '.' {
                i += 1;
            }
        } else {
            out.extend(rest.iter());
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(name: &str, path: &str, stype: SpecialFolder) -> FolderItem {
        FolderItem::new(name, FolderKind::Local)
            .with_path(path)
            .with_stype(stype)
    }

    // ── labels ───────────────────────────────────────────────────

    #[test]
    fn special_folder_at_default_path_uses_canonical_label() {
        let inbox = local("inbox", "inbox", SpecialFolder::Inbox);
        assert_eq!(base_label(&inbox, false, 16), "Inbox");

        let sent = local("sent", "sent", SpecialFolder::Outbox);
        assert_eq!(base_label(&sent, false, 16), "Sent");

        let drafts = local("draft", "draft", SpecialFolder::Drafts);
        assert_eq!(base_label(&drafts, false, 16), "Drafts");
    }

    #[test]
    fn customized_special_folder_keeps_its_name() {
        let inbox = local("MyCustomInbox", "MyCustomInbox", SpecialFolder::Inbox);
        assert_eq!(base_label(&inbox, false, 16), "MyCustomInbox");
    }

    #[test]
    fn remote_special_folder_keeps_its_name() {
        let inbox = FolderItem::new("INBOX", FolderKind::Imap)
            .with_path("inbox")
            .with_stype(SpecialFolder::Inbox);
        assert_eq!(base_label(&inbox, false, 16), "INBOX");
    }

    #[test]
    fn container_roots_get_protocol_tag() {
        let mh = FolderItem::new("Mailbox", FolderKind::Local);
        assert_eq!(base_label(&mh, true, 16), "Mailbox (MH)");
        let imap = FolderItem::new("work", FolderKind::Imap);
        assert_eq!(base_label(&imap, true, 16), "work (IMAP4)");
        let news = FolderItem::new("news.example.org", FolderKind::News);
        assert_eq!(base_label(&news, true, 16), "news.example.org (News)");
    }

    #[test]
    fn newsgroup_named_by_path_is_abbreviated() {
        let ng = FolderItem::new("comp.lang.c.moderated", FolderKind::News)
            .with_path("comp.lang.c.moderated");
        assert_eq!(base_label(&ng, false, 16), "c.l.c.moderated");

        let renamed = FolderItem::new("C lang", FolderKind::News).with_path("comp.lang.c");
        assert_eq!(base_label(&renamed, false, 4), "C lang");
    }

    #[test]
    fn abbreviation_stops_once_it_fits() {
        assert_eq!(abbrev_newsgroup_name("comp.lang.rust", 20), "comp.lang.rust");
        assert_eq!(abbrev_newsgroup_name("comp.lang.rust", 11), "c.lang.rust");
        assert_eq!(abbrev_newsgroup_name("comp.lang.rust", 1), "c.l.rust");
        assert_eq!(abbrev_newsgroup_name("alt", 1), "alt");
    }

    // ── suffixes ─────────────────────────────────────────────────

    #[test]
    fn unread_suffix_variants() {
        let five = FolderItem::new("a", FolderKind::Local).with_counts(0, 5, 9);
        assert_eq!(counter_suffix(&five, false).as_deref(), Some(" (5)"));
        assert_eq!(counter_suffix(&five, true).as_deref(), Some(" (5+)"));

        let none = FolderItem::new("b", FolderKind::Local).with_counts(0, 0, 9);
        assert_eq!(counter_suffix(&none, true).as_deref(), Some(" (+)"));
        assert_eq!(counter_suffix(&none, false), None);
    }

    #[test]
    fn queue_suffix_shows_total() {
        let q = local("queue", "queue", SpecialFolder::Queue).with_counts(0, 0, 3);
        assert_eq!(counter_suffix(&q, false).as_deref(), Some(" (3)"));
        assert_eq!(counter_suffix(&q, true).as_deref(), Some(" (3+)"));
    }

    #[test]
    fn root_columns_are_dashes() {
        let root = FolderItem::new("Mailbox", FolderKind::Local).with_counts(1, 2, 3);
        assert_eq!(
            counter_columns(&root, true),
            ("-".to_string(), "-".to_string(), "-".to_string())
        );
        assert_eq!(
            counter_columns(&root, false),
            ("1".to_string(), "2".to_string(), "3".to_string())
        );
    }

    // ── icons ────────────────────────────────────────────────────

    #[test]
    fn icon_pairs_by_type() {
        let q = local("queue", "queue", SpecialFolder::Queue);
        assert_eq!(icons_for(&q), (FolderIcon::Outbox, FolderIcon::Outbox));

        let placeholder = FolderItem::new("[Gmail]", FolderKind::Imap).no_select(true);
        assert_eq!(icons_for(&placeholder), (FolderIcon::NoSelect, FolderIcon::NoSelect));

        let plain = FolderItem::new("work", FolderKind::Imap);
        assert_eq!(icons_for(&plain), (FolderIcon::FolderClosed, FolderIcon::FolderOpen));
    }
}
