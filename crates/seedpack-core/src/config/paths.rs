//! Config and state path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "seedpack.toml";

const APP_DIR: &str = "seedpack";

pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// `~/.config/seedpack` on Linux, falling back to `<home>/.config/seedpack`.
pub fn default_config_dir(home_dir: &Path) -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join(APP_DIR))
        .unwrap_or_else(|| home_dir.join(".config").join(APP_DIR))
}

/// Directory holding the persisted session token.
pub fn default_state_dir(home_dir: &Path) -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR))
        .unwrap_or_else(|| home_dir.join(".local").join("share").join(APP_DIR))
}
