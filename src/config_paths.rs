//! Centralized configuration paths for bindform
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/bindform/`
//! - Windows: `%APPDATA%\bindform\`

use std::{env, path::PathBuf};

const APP_DIR: &str = "bindform";

/// Base config directory for bindform
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/bindform`
///   - Else: `~/.config/bindform`
///
/// Windows:
///   - `%APPDATA%\bindform`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/bindform/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}
