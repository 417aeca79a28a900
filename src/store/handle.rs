use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tokio::sync::{mpsc, oneshot};

use super::commands::CacheCmd;
use super::queries;
use super::schema::{run_migrations, SCHEMA};
use crate::tree::FolderTree;

// ---------------------------------------------------------------------------
// CacheHandle — Clone + Send + Sync async facade
// ---------------------------------------------------------------------------

/// Persists folder trees (collapse state and counters) between sessions.
#[derive(Clone)]
pub struct CacheHandle {
    tx: mpsc::UnboundedSender<CacheCmd>,
}

impl CacheHandle {
    /// Open (or create) the cache database in the user data dir.
    pub fn open() -> Result<Self, String> {
        Self::open_at(&Self::resolve_path())
    }

    /// Open (or create) `folders.db` inside `dir`.
    pub fn open_at(dir: &Path) -> Result<Self, String> {
        std::fs::create_dir_all(dir).map_err(|e| format!("Failed to create cache dir: {e}"))?;

        let db_file = dir.join("folders.db");
        let conn =
            Connection::open(&db_file).map_err(|e| format!("Failed to open cache db: {e}"))?;
        Self::start(conn)
    }

    /// Throwaway cache, mostly for tests.
    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory()
            .map_err(|e| format!("Failed to open in-memory cache: {e}"))?;
        Self::start(conn)
    }

    fn start(conn: Connection) -> Result<Self, String> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| format!("Failed to init cache schema: {e}"))?;

        run_migrations(&conn);

        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("folderview-cache".into())
            .spawn(move || run_loop(conn, rx))
            .map_err(|e| format!("Failed to spawn cache thread: {e}"))?;

        Ok(CacheHandle { tx })
    }

    fn resolve_path() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("folderview")
    }

    // -- async methods -------------------------------------------------------

    pub async fn save_tree(&self, account_id: String, tree: FolderTree) -> Result<(), String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CacheCmd::SaveTree { account_id, tree, reply })
            .map_err(|_| "Cache unavailable".to_string())?;
        rx.await.map_err(|_| "Cache unavailable".to_string())?
    }

    /// Load the stored tree for an account. An unknown account yields an empty tree.
    pub async fn load_tree(&self, account_id: String) -> Result<FolderTree, String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CacheCmd::LoadTree { account_id, reply })
            .map_err(|_| "Cache unavailable".to_string())?;
        rx.await.map_err(|_| "Cache unavailable".to_string())?
    }

    /// Persist a single expand/collapse toggle. Returns false if no stored
    /// folder has that path.
    pub async fn set_collapsed(
        &self,
        account_id: String,
        path: String,
        collapsed: bool,
    ) -> Result<bool, String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CacheCmd::SetCollapsed {
                account_id,
                path,
                collapsed,
                reply,
            })
            .map_err(|_| "Cache unavailable".to_string())?;
        rx.await.map_err(|_| "Cache unavailable".to_string())?
    }

    /// Remove all cached folders for an account.
    pub async fn remove_account(&self, account_id: String) -> Result<(), String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CacheCmd::RemoveAccount { account_id, reply })
            .map_err(|_| "Cache unavailable".to_string())?;
        rx.await.map_err(|_| "Cache unavailable".to_string())?
    }
}

// -- background thread ---------------------------------------------------

fn run_loop(conn: Connection, mut rx: mpsc::UnboundedReceiver<CacheCmd>) {
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            CacheCmd::SaveTree { account_id, tree, reply } => {
                let _ = reply.send(queries::do_save_tree(&conn, &account_id, &tree));
            }
            CacheCmd::LoadTree { account_id, reply } => {
                let _ = reply.send(queries::do_load_tree(&conn, &account_id));
            }
            CacheCmd::SetCollapsed {
                account_id,
                path,
                collapsed,
                reply,
            } => {
                let result = queries::do_set_collapsed(&conn, &account_id, &path, collapsed);
                let _ = reply.send(result);
            }
            CacheCmd::RemoveAccount { account_id, reply } => {
                let _ = reply.send(queries::do_remove_account(&conn, &account_id));
            }
        }
    }
    log::debug!("Cache thread exiting");
}
