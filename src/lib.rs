pub mod aggregate;
pub mod config;
pub mod display;
pub mod models;
pub mod store;
pub mod tree;
pub mod view;

pub use aggregate::{
    add_unread_mark, display_state, find_next_unread, has_new_descendant, has_unread_descendant,
    recompute_ancestor_chain, refresh_dirty, update_row,
};
pub use config::ViewPrefs;
pub use display::{DisplayState, FolderIcon, Foreground};
pub use models::{FolderId, FolderItem, FolderKind, SpecialFolder};
pub use tree::{FolderNode, FolderTree};
pub use view::FolderView;
