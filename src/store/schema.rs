use rusqlite::Connection;

/// Schema DDL run on open.
///
/// `position` is the folder's pre-order index within its account, so a
/// parent's row always sorts before its children.
pub(super) const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS folders (
    account_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    parent_position INTEGER,
    name TEXT NOT NULL,
    path TEXT,
    stype TEXT NOT NULL DEFAULT 'normal',
    kind TEXT NOT NULL DEFAULT 'local',
    unread_count INTEGER DEFAULT 0,
    total_count INTEGER DEFAULT 0,
    collapsed INTEGER DEFAULT 0,
    PRIMARY KEY (account_id, position)
);
";

/// Run forward-only migrations. Each ALTER is idempotent (ignores "duplicate column" errors).
pub(super) fn run_migrations(conn: &Connection) {
    let alters = [
        "ALTER TABLE folders ADD COLUMN new_count INTEGER DEFAULT 0",
        "ALTER TABLE folders ADD COLUMN no_select INTEGER DEFAULT 0",
    ];
    for sql in &alters {
        // "duplicate column name" is the expected error when already migrated
        if let Err(e) = conn.execute(sql, []) {
            let msg = e.to_string();
            if !msg.contains("duplicate column") {
                log::warn!("Migration failed ({}): {}", sql, msg);
            }
        }
    }

    let indexes = ["CREATE INDEX IF NOT EXISTS idx_folders_path ON folders(account_id, path)"];
    for sql in &indexes {
        if let Err(e) = conn.execute(sql, []) {
            log::warn!("Index creation failed: {}", e);
        }
    }
}
