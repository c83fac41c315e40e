//! Core console types with zero optional dependencies.
//!
//! This module provides the fundamental building blocks:
//! - [`parse`] - Command-line tokenizer (statements, quoting)
//! - [`ConsoleRegistry`] - Commands and variables, and [`execute_line`]
//! - [`ConVar`] / [`VariableStore`] - Persisted console variables
//! - [`ConCommand`] / [`ConsoleCommand`] - Console commands
//! - [`Autocompletion`] and [`LineEditor`] - Prompt editing
//! - [`KeyBindings`] - Input to command-line bindings
//! - [`ConsoleOutput`] - Output buffer
//! - Messages for communication with the rest of the app

mod bindings;
mod command;
mod completion;
mod console;
mod convar;
mod editor;
mod events;
mod output;
mod registry;
mod relative;
mod state;
mod tokenizer;
mod variables;

pub use bindings::{BindInput, BindParseError, GAMEPAD_PREFIX, KeyBindings, complete_key_name};
pub use command::{
    AutocompleteProvider, CommandArgs, CommandHandler, ConCommand, ConsoleCommand, complete_from,
};
pub use completion::Autocompletion;
pub use console::{Console, ConsoleRef};
pub use convar::{ChangeCallback, ConVar, format_float, parse_number};
pub use editor::LineEditor;
pub use events::{
    ConVarChangedEvent, ConsoleEventsPlugin, ConsoleInputEvent, ConsoleOutputEvent,
    ConsoleToggleEvent,
};
pub use output::{ConsoleOutput, DEFAULT_OUTPUT_CAPACITY, OutputLevel, OutputLine};
pub use registry::{CommandMeta, ConsoleRegistry, Resolved, execute_line, print};
pub use relative::{RELATIVE_MARKER, complete_coordinate, parse_relative, parse_relative_vec3};
pub use state::{ConsoleInput, ConsoleState, console_closed};
pub use tokenizer::{ParsedSequence, ParsedStatement, parse, quote};
pub use variables::VariableStore;
