use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default newsgroup label length before components get abbreviated.
pub const DEFAULT_NG_ABBREV_LEN: usize = 16;

const MAX_NG_ABBREV_LEN: usize = 255;

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folderview")
}

fn config_path() -> PathBuf {
    config_dir().join("folderview.json")
}

// ---------------------------------------------------------------------------
// Folder pane preferences
// ---------------------------------------------------------------------------

/// User preferences that change how folder rows are labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPrefs {
    /// Append the unread count (or queue total) to folder labels.
    #[serde(default = "default_true")]
    pub display_folder_unread: bool,
    /// Maximum newsgroup label length before abbreviation kicks in.
    #[serde(default = "default_ng_abbrev_len")]
    pub ng_abbrev_len: usize,
}

fn default_true() -> bool {
    true
}

fn default_ng_abbrev_len() -> usize {
    DEFAULT_NG_ABBREV_LEN
}

impl Default for ViewPrefs {
    fn default() -> Self {
        Self {
            display_folder_unread: true,
            ng_abbrev_len: DEFAULT_NG_ABBREV_LEN,
        }
    }
}

impl ViewPrefs {
    /// Load from the user config dir, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(_) => {
                log::info!("No folder view prefs at {}, using defaults", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str::<ViewPrefs>(&data) {
            Ok(prefs) => prefs.clamped(),
            Err(e) => {
                log::warn!("Failed to parse {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), String> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create config dir: {e}"))?;
        }
        let data =
            serde_json::to_string_pretty(self).map_err(|e| format!("serialize prefs: {e}"))?;
        fs::write(path, data).map_err(|e| format!("write prefs: {e}"))
    }

    fn clamped(self) -> Self {
        ViewPrefs {
            ng_abbrev_len: self.ng_abbrev_len.clamp(1, MAX_NG_ABBREV_LEN),
            ..self
        }
    }
}
