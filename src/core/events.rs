//! Console messages for communication with the rest of the app.
//!
//! - Host -> Console: command lines to execute, output to print
//! - Console -> Host: open/close notifications, variable changes

use bevy::prelude::*;

use super::OutputLevel;

/// Message carrying a command line to execute.
///
/// The line goes through the same path as one typed at the prompt, minus the
/// echo and history.
///
/// # Examples
///
/// ```ignore
/// fn start_fast(mut input: MessageWriter<ConsoleInputEvent>) {
///     input.write(ConsoleInputEvent::new("timescale 2; noclip 1"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw command line.
    pub command: String,
}

impl ConsoleInputEvent {
    /// Create a new input message.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Message asking for a line to be printed in the console.
///
/// Useful from systems that should not hold `ResMut<ConsoleOutput>`.
#[derive(Message, Debug, Clone)]
pub struct ConsoleOutputEvent {
    /// The text to print.
    pub message: String,
    /// The severity.
    pub level: OutputLevel,
}

impl ConsoleOutputEvent {
    /// Create a new output message.
    pub fn new(level: OutputLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    /// Create an info message.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(OutputLevel::Info, message)
    }

    /// Create a warning message.
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(OutputLevel::Warning, message)
    }

    /// Create an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(OutputLevel::Error, message)
    }
}

/// Message sent after a console variable changed value.
///
/// # Examples
///
/// ```ignore
/// fn on_timescale(mut changes: MessageReader<ConVarChangedEvent>, mut time: ResMut<Time<Virtual>>) {
///     for change in changes.read().filter(|c| &*c.name == "timescale") {
///         if let Ok(scale) = change.new_value.parse::<f32>() {
///             time.set_relative_speed(scale);
///         }
///     }
/// }
/// ```
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ConVarChangedEvent {
    /// The variable name.
    pub name: Box<str>,
    /// The value before the write.
    pub old_value: String,
    /// The value after the write, clamped.
    pub new_value: String,
}

impl ConVarChangedEvent {
    /// Create a new change message.
    pub fn new(
        name: impl Into<Box<str>>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }
}

/// Message sent when the console is opened or closed.
///
/// While the console is open it captures keyboard input; hosts should pause
/// their own input handling (see [`ConsoleState::captures_input`](super::ConsoleState::captures_input)).
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleToggleEvent {
    /// Whether the console is now open.
    pub open: bool,
}

impl ConsoleToggleEvent {
    /// Create a message for opening the console.
    pub fn opened() -> Self {
        Self { open: true }
    }

    /// Create a message for closing the console.
    pub fn closed() -> Self {
        Self { open: false }
    }
}

/// Plugin that registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleOutputEvent>()
            .add_message::<ConVarChangedEvent>()
            .add_message::<ConsoleToggleEvent>();
    }
}
