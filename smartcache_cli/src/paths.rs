//! Centralized path management for the smartcache CLI
//!
//! Every command resolves the snapshot and configuration locations through
//! these helpers so they always agree.

use std::path::{Path, PathBuf};

/// The name of the application directory used across all platforms
const APP_DIR: &str = "smartcache";

/// The name of the snapshot file
pub const SNAPSHOT_FILE: &str = smartcache_core::persistence::file::SNAPSHOT_FILE;

/// The name of the configuration file
const CONFIG_FILE: &str = "config.toml";

/// Returns the base data directory for the application
///
/// On Unix-like systems this follows the XDG Base Directory specification
/// (`~/.local/share/smartcache`); on Windows it is `%APPDATA%/smartcache`.
/// Falls back to `.smartcache` in the current directory.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".smartcache"))
}

/// Default location of the cache snapshot
pub fn get_snapshot_path() -> PathBuf {
    get_data_dir().join(SNAPSHOT_FILE)
}

/// Returns the configuration directory, honouring `XDG_CONFIG_HOME`
pub fn get_config_dir() -> PathBuf {
    #[cfg(not(target_os = "windows"))]
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join(APP_DIR);
    }

    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".smartcache"))
}

/// Returns the path to the configuration file
pub fn get_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE)
}

/// Resolve the snapshot location: explicit flag, then config, then default
pub fn resolve_snapshot_path(flag: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    flag.or(configured)
        .map(Path::to_path_buf)
        .unwrap_or_else(get_snapshot_path)
}
