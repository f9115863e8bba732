//! Platform-specific configuration paths.
//!
//! - **User config**: `~/.config/drumcheck/` (Linux),
//!   `~/Library/Application Support/drumcheck/` (macOS), `%APPDATA%\drumcheck\` (Windows)
//! - **Default profile**: `profile.toml` inside the user config directory

use std::path::PathBuf;

use crate::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "drumcheck";

/// File name of the user's default analysis profile.
const PROFILE_FILE: &str = "profile.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the profile picked up when no `--config` is given.
pub fn default_profile_path() -> PathBuf {
    user_config_dir().join(PROFILE_FILE)
}

/// Ensure the user config directory exists, creating it if necessary.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}
