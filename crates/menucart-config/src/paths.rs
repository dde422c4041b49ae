//! Resolution of the configuration file and the files next to it

use std::path::{Path, PathBuf};

/// Environment variable that overrides the configuration file location
pub const CONFIG_ENV: &str = "MENUCART_CONFIG";

const APP_DIR: &str = "wp-menu-cart";
const CONFIG_FILE: &str = "menucart.toml";

/// Default directory holding the configuration, options and translations
///
/// - **Unix/macOS**: `~/.config/wp-menu-cart`
/// - **Windows**: `%APPDATA%\wp-menu-cart`
pub fn default_config_dir() -> Option<PathBuf> {
    #[cfg(not(target_os = "windows"))]
    let dir = dirs::home_dir().map(|home| home.join(".config").join(APP_DIR));

    #[cfg(target_os = "windows")]
    let dir = dirs::config_dir().map(|config| config.join(APP_DIR));

    dir
}

/// Resolve the configuration file path.
///
/// A non-empty `MENUCART_CONFIG` wins; otherwise the platform default is
/// used, falling back to the working directory when no home is known.
pub fn config_path() -> PathBuf {
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let trimmed = env_path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    default_config_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Resolve `relative` against the directory holding `config_file`.
/// Absolute paths are returned unchanged.
pub fn sibling_of(config_file: &Path, relative: &str) -> PathBuf {
    let candidate = PathBuf::from(relative);
    if candidate.is_absolute() {
        return candidate;
    }
    config_file
        .parent()
        .map(|dir| dir.join(&candidate))
        .unwrap_or(candidate)
}
