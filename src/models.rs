use serde::{Deserialize, Serialize};

/// Handle to a node in a [`FolderTree`](crate::tree::FolderTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FolderId(pub u64);

/// Semantic role of a folder, independent of where it is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialFolder {
    #[default]
    Normal,
    Inbox,
    Outbox,
    Queue,
    Trash,
    Drafts,
}

impl SpecialFolder {
    /// Path a local mailbox uses for this role when the user hasn't customized it.
    pub fn default_path(self) -> Option<&'static str> {
        match self {
            SpecialFolder::Inbox => Some("inbox"),
            SpecialFolder::Outbox => Some("sent"),
            SpecialFolder::Queue => Some("queue"),
            SpecialFolder::Trash => Some("trash"),
            SpecialFolder::Drafts => Some("draft"),
            SpecialFolder::Normal => None,
        }
    }

    pub fn canonical_label(self) -> Option<&'static str> {
        match self {
            SpecialFolder::Inbox => Some("Inbox"),
            SpecialFolder::Outbox => Some("Sent"),
            SpecialFolder::Queue => Some("Queue"),
            SpecialFolder::Trash => Some("Trash"),
            SpecialFolder::Drafts => Some("Drafts"),
            SpecialFolder::Normal => None,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SpecialFolder::Normal => "normal",
            SpecialFolder::Inbox => "inbox",
            SpecialFolder::Outbox => "outbox",
            SpecialFolder::Queue => "queue",
            SpecialFolder::Trash => "trash",
            SpecialFolder::Drafts => "drafts",
        }
    }

    pub(crate) fn from_str_lossy(s: &str) -> Self {
        match s {
            "inbox" => SpecialFolder::Inbox,
            "outbox" => SpecialFolder::Outbox,
            "queue" => SpecialFolder::Queue,
            "trash" => SpecialFolder::Trash,
            "drafts" => SpecialFolder::Drafts,
            _ => SpecialFolder::Normal,
        }
    }
}

/// Protocol of the mailbox container a folder belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FolderKind {
    /// MH directory on local disk.
    #[default]
    Local,
    Imap,
    News,
}

impl FolderKind {
    /// Suffix appended to the label of a container's top-level node.
    pub fn protocol_tag(self) -> &'static str {
        match self {
            FolderKind::Local => " (MH)",
            FolderKind::Imap => " (IMAP4)",
            FolderKind::News => " (News)",
        }
    }

    pub fn is_local(self) -> bool {
        matches!(self, FolderKind::Local)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            FolderKind::Local => "local",
            FolderKind::Imap => "imap",
            FolderKind::News => "news",
        }
    }

    pub(crate) fn from_str_lossy(s: &str) -> Self {
        match s {
            "imap" => FolderKind::Imap,
            "news" => FolderKind::News,
            _ => FolderKind::Local,
        }
    }
}

/// A mail folder as supplied by the folder-management layer.
///
/// `new`, `unread` and `total` are independent counters: new mail is not
/// necessarily unread, so no ordering between them is assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub stype: SpecialFolder,
    #[serde(default)]
    pub kind: FolderKind,
    #[serde(default)]
    pub new: u32,
    #[serde(default)]
    pub unread: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub no_select: bool,
}

impl FolderItem {
    pub fn new(name: impl Into<String>, kind: FolderKind) -> Self {
        FolderItem {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_stype(mut self, stype: SpecialFolder) -> Self {
        self.stype = stype;
        self
    }

    pub fn with_counts(mut self, new: u32, unread: u32, total: u32) -> Self {
        self.new = new;
        self.unread = unread;
        self.total = total;
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn no_select(mut self, no_select: bool) -> Self {
        self.no_select = no_select;
        self
    }

    /// A queue holding outgoing mail counts as "interesting" just like unread mail.
    pub fn is_pending_queue(&self) -> bool {
        self.stype == SpecialFolder::Queue && self.total > 0
    }

    pub fn has_unread(&self) -> bool {
        self.unread > 0 || self.is_pending_queue()
    }

    pub fn has_new(&self) -> bool {
        self.new > 0 || self.is_pending_queue()
    }
}
