use std::collections::HashMap;

use rusqlite::Connection;

use crate::models::{FolderId, FolderItem, FolderKind, SpecialFolder};
use crate::tree::FolderTree;

/// Row as stored; `parent_position` is `None` for container roots.
struct FolderRow {
    position: i64,
    parent_position: Option<i64>,
    item: FolderItem,
}

/// Expects columns in this order:
///   0: position, 1: parent_position, 2: name, 3: path, 4: stype, 5: kind,
///   6: new_count, 7: unread_count, 8: total_count, 9: collapsed, 10: no_select
fn row_to_folder(row: &rusqlite::Row<'_>) -> rusqlite::Result<FolderRow> {
    let stype: String = row.get(4)?;
    let kind: String = row.get(5)?;
    Ok(FolderRow {
        position: row.get(0)?,
        parent_position: row.get(1)?,
        item: FolderItem {
            name: row.get(2)?,
            path: row.get(3)?,
            stype: SpecialFolder::from_str_lossy(&stype),
            kind: FolderKind::from_str_lossy(&kind),
            new: row.get::<_, Option<u32>>(6)?.unwrap_or(0),
            unread: row.get::<_, Option<u32>>(7)?.unwrap_or(0),
            total: row.get::<_, Option<u32>>(8)?.unwrap_or(0),
            collapsed: row.get::<_, Option<i32>>(9)?.unwrap_or(0) != 0,
            no_select: row.get::<_, Option<i32>>(10)?.unwrap_or(0) != 0,
        },
    })
}

pub(super) fn do_save_tree(
    conn: &Connection,
    account_id: &str,
    tree: &FolderTree,
) -> Result<(), String> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| format!("Cache tx error: {e}"))?;

    // The stored tree is replaced wholesale; positions are re-derived each save.
    tx.execute("DELETE FROM folders WHERE account_id = ?1", [account_id])
        .map_err(|e| format!("Cache folder cleanup error: {e}"))?;

    let mut stmt = tx
        .prepare(
            "INSERT INTO folders (account_id, position, parent_position, name, path, stype, kind,
                                  new_count, unread_count, total_count, collapsed, no_select)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .map_err(|e| format!("Cache prepare error: {e}"))?;

    let order = tree.preorder();
    let positions: HashMap<FolderId, i64> = order
        .iter()
        .enumerate()
        .map(|(pos, id)| (*id, pos as i64))
        .collect();

    for (pos, id) in order.iter().enumerate() {
        let Some(item) = tree.item(*id) else {
            continue;
        };
        let parent_position = tree.parent(*id).and_then(|p| positions.get(&p).copied());
        stmt.execute(rusqlite::params![
            account_id,
            pos as i64,
            parent_position,
            item.name,
            item.path,
            item.stype.as_str(),
            item.kind.as_str(),
            item.new,
            item.unread,
            item.total,
            item.collapsed as i32,
            item.no_select as i32,
        ])
        .map_err(|e| format!("Cache insert error: {e}"))?;
    }
    drop(stmt);

    tx.commit()
        .map_err(|e| format!("Cache commit error: {e}"))?;
    log::debug!("Saved {} folders for account {account_id:?}", order.len());
    Ok(())
}

pub(super) fn do_load_tree(conn: &Connection, account_id: &str) -> Result<FolderTree, String> {
    let mut stmt = conn
        .prepare(
            "SELECT position, parent_position, name, path, stype, kind,
                    new_count, unread_count, total_count, collapsed, no_select
             FROM folders WHERE account_id = ?1
             ORDER BY position",
        )
        .map_err(|e| format!("Cache prepare error: {e}"))?;

    let rows = stmt
        .query_map([account_id], row_to_folder)
        .map_err(|e| format!("Cache query error: {e}"))?;

    let mut tree = FolderTree::new();
    let mut by_position: HashMap<i64, FolderId> = HashMap::new();
    for row in rows {
        let row = row.map_err(|e| format!("Cache row error: {e}"))?;
        let parent = row.parent_position.and_then(|p| by_position.get(&p).copied());
        let id = match (row.parent_position, parent) {
            (Some(_), Some(parent)) => tree.add_child(parent, row.item),
            (Some(p), None) => {
                log::warn!(
                    "Folder {:?} references missing parent position {p}, attaching as root",
                    row.item.name
                );
                Some(tree.add_root(row.item))
            }
            (None, _) => Some(tree.add_root(row.item)),
        };
        if let Some(id) = id {
            by_position.insert(row.position, id);
        }
    }
    tree.clear_all_dirty();
    Ok(tree)
}

pub(super) fn do_set_collapsed(
    conn: &Connection,
    account_id: &str,
    path: &str,
    collapsed: bool,
) -> Result<bool, String> {
    let changed = conn
        .execute(
            "UPDATE folders SET collapsed = ?1 WHERE account_id = ?2 AND path = ?3",
            rusqlite::params![collapsed as i32, account_id, path],
        )
        .map_err(|e| format!("Cache update error: {e}"))?;
    Ok(changed > 0)
}

pub(super) fn do_remove_account(conn: &Connection, account_id: &str) -> Result<(), String> {
    conn.execute("DELETE FROM folders WHERE account_id = ?1", [account_id])
        .map_err(|e| format!("Cache folder cleanup error: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;
    use crate::store::schema::{run_migrations, SCHEMA};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute_batch(SCHEMA).expect("schema");
        run_migrations(&conn);
        conn
    }

    fn sample() -> FolderTree {
        let mut t = FolderTree::new();
        let root = t.add_root(FolderItem::new("Mailbox", FolderKind::Local));
        t.add_child(
            root,
            FolderItem::new("inbox", FolderKind::Local)
                .with_path("inbox")
                .with_stype(SpecialFolder::Inbox)
                .with_counts(1, 2, 3),
        );
        let work = t
            .add_child(
                root,
                FolderItem::new("work", FolderKind::Local)
                    .with_path("work")
                    .collapsed(true),
            )
            .expect("work");
        t.add_child(work, FolderItem::new("team", FolderKind::Local).with_path("work/team"));
        let news = t.add_root(FolderItem::new("news.example.org", FolderKind::News));
        t.add_child(
            news,
            FolderItem::new("comp.lang.rust", FolderKind::News)
                .with_path("comp.lang.rust")
                .no_select(true),
        );
        t
    }

    fn shape(t: &FolderTree) -> Vec<(String, Option<String>, FolderItem)> {
        t.preorder()
            .into_iter()
            .map(|id| {
                let parent = t
                    .parent(id)
                    .and_then(|p| t.item(p))
                    .map(|p| p.name.clone());
                let item = t.item(id).cloned().unwrap_or_default();
                (item.name.clone(), parent, item)
            })
            .collect()
    }

    #[test]
    fn saved_tree_loads_with_same_shape() {
        let conn = conn();
        let tree = sample();
        do_save_tree(&conn, "a", &tree).expect("save");

        let mut loaded = do_load_tree(&conn, "a").expect("load");
        assert_eq!(shape(&loaded), shape(&tree));
        assert!(loaded.take_dirty().is_empty());
    }

    #[test]
    fn saving_replaces_previous_tree() {
        let conn = conn();
        do_save_tree(&conn, "a", &sample()).expect("save");

        let mut small = FolderTree::new();
        small.add_root(FolderItem::new("only", FolderKind::Imap));
        do_save_tree(&conn, "a", &small).expect("save again");

        let loaded = do_load_tree(&conn, "a").expect("load");
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn accounts_are_isolated() {
        let conn = conn();
        do_save_tree(&conn, "a", &sample()).expect("save a");
        assert!(do_load_tree(&conn, "b").expect("load b").is_empty());

        do_remove_account(&conn, "a").expect("remove");
        assert!(do_load_tree(&conn, "a").expect("load a").is_empty());
    }

    #[test]
    fn collapse_toggle_persists_by_path() {
        let conn = conn();
        do_save_tree(&conn, "a", &sample()).expect("save");

        assert!(do_set_collapsed(&conn, "a", "work", false).expect("update"));
        assert!(!do_set_collapsed(&conn, "a", "missing", true).expect("update"));

        let loaded = do_load_tree(&conn, "a").expect("load");
        let work = loaded.find_by_path("work").expect("work");
        assert!(!loaded.item(work).expect("item").collapsed);
    }

    #[test]
    fn orphaned_row_becomes_root() {
        let conn = conn();
        conn.execute(
            "INSERT INTO folders (account_id, position, parent_position, name)
             VALUES ('a', 0, 42, 'stray')",
            [],
        )
        .expect("insert orphan");
        let loaded = do_load_tree(&conn, "a").expect("load");
        assert_eq!(loaded.roots().len(), 1);
    }
}
