//! RON settings file for [`ConsoleConfig`].

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::PersistError;
use crate::config::ConsoleConfig;
use crate::core::BindInput;

/// Default settings file name.
pub const DEFAULT_SETTINGS_FILE: &str = "console.ron";

/// Serializable mirror of the scalar [`ConsoleConfig`] settings.
///
/// Missing fields take their default values, so a file only needs the
/// settings it changes:
///
/// ```ron
/// (
///     toggle_key: "F1",
///     help_page_size: 20,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfigFile {
    /// Toggle key, as a bind key name.
    pub toggle_key: String,
    /// Character produced by the toggle key.
    pub toggle_char: Option<char>,
    /// Number of output lines kept.
    pub output_capacity: usize,
    /// Bindings file name.
    pub binds_file: String,
    /// Variables file name.
    pub vars_file: String,
    /// Commands listed per `help` page.
    pub help_page_size: usize,
    /// Cursor blink period in seconds.
    pub cursor_blink_period: f32,
}

impl Default for ConsoleConfigFile {
    fn default() -> Self {
        Self::from_config(&ConsoleConfig::default())
    }
}

impl ConsoleConfigFile {
    /// Capture the scalar settings of `config`.
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            toggle_key: BindInput::Key(config.toggle_key).to_string(),
            toggle_char: Some(config.toggle_char),
            output_capacity: config.output_capacity,
            binds_file: config.binds_file.clone(),
            vars_file: config.vars_file.clone(),
            help_page_size: config.help_page_size,
            cursor_blink_period: config.cursor_blink_period,
        }
    }

    /// Load settings from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;

        ron::from_str(&contents).map_err(|e| PersistError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load settings from a RON file, falling back to defaults if it is
    /// missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No console settings found at '{}', using defaults", path.display());
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            error!("Console: Failed to load settings: {}", e);
            Self::default()
        })
    }

    /// Save settings to a RON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
            }
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| PersistError::Serialize(e.to_string()))?;

        fs::write(path, contents).map_err(|e| PersistError::io(path, e))
    }

    /// Copy these settings into `config`.
    ///
    /// An unknown or non-keyboard toggle key is logged and ignored.
    pub fn apply_to(&self, config: &mut ConsoleConfig) {
        match self.toggle_key.parse::<BindInput>() {
            Ok(BindInput::Key(code)) => config.toggle_key = code,
            Ok(BindInput::Gamepad(_)) => {
                warn!("Console: Toggle key must be a keyboard key: {}", self.toggle_key)
            }
            Err(e) => warn!("Console: {}", e),
        }

        if let Some(c) = self.toggle_char {
            config.toggle_char = c;
        }
        config.output_capacity = self.output_capacity.max(1);
        config.binds_file = self.binds_file.clone();
        config.vars_file = self.vars_file.clone();
        config.help_page_size = self.help_page_size.max(1);
        config.cursor_blink_period = self.cursor_blink_period;
    }
}
