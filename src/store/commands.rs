use tokio::sync::oneshot;

use crate::tree::FolderTree;

pub(super) enum CacheCmd {
    SaveTree {
        account_id: String,
        tree: FolderTree,
        reply: oneshot::Sender<Result<(), String>>,
    },
    LoadTree {
        account_id: String,
        reply: oneshot::Sender<Result<FolderTree, String>>,
    },
    SetCollapsed {
        account_id: String,
        path: String,
        collapsed: bool,
        reply: oneshot::Sender<Result<bool, String>>,
    },
    RemoveAccount {
        account_id: String,
        reply: oneshot::Sender<Result<(), String>>,
    },
}
