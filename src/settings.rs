//! Persisted client settings
//!
//! The only durable client-side state is the theme preference (the
//! localStorage analog of the web UI). Stored as YAML under the user
//! config dir; a missing or unreadable file silently falls back to
//! defaults.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{LazyLock, RwLock};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "paperchat";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// `light` or `dark`
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            theme: default_theme(),
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from disk into the global store
pub fn load_settings() {
    let Some(path) = config_path() else {
        warn!("could not determine config directory, using default settings");
        return;
    };

    match fs::read_to_string(&path) {
        Ok(contents) => match serde_yaml::from_str::<Settings>(&contents) {
            Ok(settings) => {
                *SETTINGS.write().unwrap_or_else(std::sync::PoisonError::into_inner) = settings;
            }
            Err(e) => warn!("ignoring malformed settings file {path:?}: {e}"),
        },
        Err(_) => {
            info!("settings file not found at {path:?}, using defaults");
        }
    }
}

/// Write the current settings back to disk
pub fn save_settings() {
    let Some(path) = config_path() else {
        return;
    };

    let settings = SETTINGS
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .clone();

    let serialized = match serde_yaml::to_string(&settings) {
        Ok(s) => s,
        Err(e) => {
            warn!("could not serialize settings: {e}");
            return;
        }
    };

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("could not create config directory {parent:?}: {e}");
            return;
        }
    }

    if let Err(e) = fs::write(&path, serialized) {
        warn!("could not write settings to {path:?}: {e}");
    }
}

#[must_use]
pub fn theme_name() -> String {
    SETTINGS
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .theme
        .clone()
}

/// Update the persisted theme preference and save immediately
pub fn set_theme_name(name: &str) {
    {
        let mut settings = SETTINGS
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        settings.theme = name.to_string();
    }
    save_settings();
}
