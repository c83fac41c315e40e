//! Console configuration resource.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::core::DEFAULT_OUTPUT_CAPACITY;

/// Decides whether a typed character can be inserted into the prompt.
///
/// Hosts with a bitmap font should reject glyphs the font cannot draw.
pub type GlyphFilter = fn(char) -> bool;

/// Accepts every character that is not a control character.
pub fn printable_glyph(c: char) -> bool {
    !c.is_control()
}

/// Console settings.
///
/// Inserted by [`ConsolePlugin`](crate::ConsolePlugin) if missing, so a host
/// can insert its own before adding the plugin:
///
/// ```ignore
/// app.insert_resource(ConsoleConfig {
///     toggle_key: KeyCode::F1,
///     config_dir: None,
///     ..default()
/// })
/// .add_plugins(ConsolePlugin);
/// ```
#[derive(Resource, Debug, Clone)]
pub struct ConsoleConfig {
    /// Key that opens and closes the console.
    pub toggle_key: KeyCode,
    /// Character produced by the toggle key. It is never typed into the prompt.
    pub toggle_char: char,
    /// Number of output lines kept.
    pub output_capacity: usize,
    /// Directory holding the bindings and variables files.
    ///
    /// `None` keeps everything in memory.
    pub config_dir: Option<PathBuf>,
    /// Bindings file name inside `config_dir`.
    pub binds_file: String,
    /// Variables file name inside `config_dir`.
    pub vars_file: String,
    /// Commands listed per `help` page.
    pub help_page_size: usize,
    /// Cursor blink period in seconds.
    pub cursor_blink_period: f32,
    /// Characters the prompt accepts.
    pub glyph_filter: GlyphFilter,
    /// Minimum level of captured log events shown in the output.
    #[cfg(feature = "capture-log")]
    pub captured_log_level: bevy::log::Level,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            toggle_key: KeyCode::Backquote,
            toggle_char: '`',
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
            config_dir: Some(PathBuf::from(".")),
            binds_file: "console_binds.cfg".to_string(),
            vars_file: "console_vars.cfg".to_string(),
            help_page_size: 10,
            cursor_blink_period: 1.0,
            glyph_filter: printable_glyph,
            #[cfg(feature = "capture-log")]
            captured_log_level: bevy::log::Level::INFO,
        }
    }
}

impl ConsoleConfig {
    /// Config with persistence disabled.
    pub fn in_memory() -> Self {
        Self {
            config_dir: None,
            ..default()
        }
    }

    /// Full path of the bindings file, if persistence is enabled.
    pub fn binds_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join(&self.binds_file))
    }

    /// Full path of the variables file, if persistence is enabled.
    pub fn vars_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join(&self.vars_file))
    }

    /// Whether `c` may be typed into the prompt.
    pub fn accepts(&self, c: char) -> bool {
        c != self.toggle_char && (self.glyph_filter)(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let config = ConsoleConfig {
            config_dir: Some(PathBuf::from("saves")),
            ..default()
        };
        assert_eq!(config.binds_path(), Some(PathBuf::from("saves/console_binds.cfg")));
        assert_eq!(config.vars_path(), Some(PathBuf::from("saves/console_vars.cfg")));

        let config = ConsoleConfig::in_memory();
        assert_eq!(config.binds_path(), None);
        assert_eq!(config.vars_path(), None);
    }

    #[test]
    fn test_accepts() {
        let mut config = ConsoleConfig::default();
        assert!(config.accepts('a'));
        assert!(config.accepts('é'));
        assert!(!config.accepts('`'));
        assert!(!config.accepts('\n'));

        config.glyph_filter = |c| c.is_ascii();
        assert!(!config.accepts('é'));
    }
}
