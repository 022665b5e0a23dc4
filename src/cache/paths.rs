// Cache path utilities.
// Locates the per-user cache and config directories for postdeck.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "postdeck")
}

/// Get the base cache directory (~/.cache/postdeck on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory (~/.config/postdeck on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the optional user config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Default path of the session store file.
pub fn session_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("session.json"))
}

/// Path of the tracing log file.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("postdeck.log"))
}
