use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const STATE_DIR: &str = ".readme-wizard";
pub const CONFIG_FILE: &str = ".readme-wizard/config.yaml";
pub const SNAPSHOT_FILE: &str = ".readme-wizard/progress.json";
pub const TEMPLATES_DIR: &str = ".readme-wizard/templates";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn state_dir(root: &Path) -> PathBuf {
    root.join(STATE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn snapshot_path(root: &Path) -> PathBuf {
    root.join(SNAPSHOT_FILE)
}

pub fn templates_dir(root: &Path) -> PathBuf {
    root.join(TEMPLATES_DIR)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
