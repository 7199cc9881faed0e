// src/config/mod.rs
//! Persistence of visualizer settings as JSON under the user config dir.
//!
//! Settings are loaded through the same clamping path as live updates, so a
//! hand-edited file with out-of-range numbers comes back in range instead of
//! breaking the renderer.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::viz::settings::{SettingsUpdate, VisualizerSettings};

const SETTINGS_FILE: &str = "settings.json";

/// Directory for persisted state, `$HOME/.config/prism`.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("prism"))
}

fn settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

/// Load persisted settings, falling back to defaults when the file is
/// missing or unreadable. A malformed file is ignored, not fatal.
pub fn load_settings() -> VisualizerSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => VisualizerSettings::default(),
    }
}

/// Load from an explicit path. Split out so tests can use a temp dir.
pub fn load_settings_from(path: &PathBuf) -> VisualizerSettings {
    let mut settings = VisualizerSettings::default();
    let Ok(contents) = fs::read_to_string(path) else {
        return settings;
    };
    match serde_json::from_str::<SettingsUpdate>(&contents) {
        Ok(update) => settings.apply(&update),
        Err(err) => debug!(%err, "ignoring malformed settings file"),
    }
    settings
}

/// Persist settings to the default location, creating the directory.
pub fn save_settings(settings: &VisualizerSettings) -> Result<()> {
    let path = settings_path().context("no HOME directory for settings")?;
    save_settings_to(settings, &path)
}

pub fn save_settings_to(settings: &VisualizerSettings, path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), "settings saved");
    Ok(())
}
