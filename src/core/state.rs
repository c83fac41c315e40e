//! Open/closed state and prompt state of the console.

use bevy::prelude::*;

use super::{Autocompletion, LineEditor};

/// Whether the console is open, plus cursor blink timing.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConsoleState {
    enabled: bool,
    blink_time: f32,
}

impl ConsoleState {
    /// Check if the console is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.enabled
    }

    /// Whether keyboard input belongs to the console right now.
    ///
    /// Host input systems should skip work while this is `true`; see
    /// [`console_closed`].
    #[inline]
    pub fn captures_input(&self) -> bool {
        self.enabled
    }

    /// Open or close the console.
    pub fn set_open(&mut self, open: bool) {
        self.enabled = open;
        self.reset_blink();
    }

    /// Flip the open state. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_open(!self.enabled);
        self.enabled
    }

    /// Advance the cursor blink timer.
    pub fn tick(&mut self, delta_secs: f32) {
        self.blink_time += delta_secs;
    }

    /// Restart the blink cycle with the cursor visible.
    pub fn reset_blink(&mut self) {
        self.blink_time = 0.0;
    }

    /// Seconds since the blink cycle restarted.
    #[inline]
    pub fn blink_time(&self) -> f32 {
        self.blink_time
    }

    /// Whether the cursor is drawn: the first half of every `period`.
    pub fn cursor_visible(&self, period: f32) -> bool {
        if period <= 0.0 {
            return true;
        }
        self.blink_time % period < period * 0.5
    }
}

/// Run condition that is `true` while the console is closed.
///
/// ```ignore
/// app.add_systems(Update, move_player.run_if(console_closed));
/// ```
pub fn console_closed(state: Option<Res<ConsoleState>>) -> bool {
    state.is_none_or(|state| !state.captures_input())
}

/// Prompt state: the line being edited and its completions.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConsoleInput {
    /// The line editor.
    pub editor: LineEditor,
    /// Completions for the current line.
    pub completion: Autocompletion,
}
