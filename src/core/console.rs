//! Unified console API for convenient access.
//!
//! The [`Console`] system parameter combines [`ConsoleRegistry`],
//! [`ConsoleOutput`] and [`KeyBindings`] behind one interface.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{
    BindInput, CommandMeta, ConVar, ConsoleCommand, ConsoleOutput, ConsoleRegistry, KeyBindings,
    OutputLevel,
};

/// Unified console system parameter.
///
/// # Examples
///
/// ```ignore
/// fn setup_console(mut console: Console) {
///     console.register_var(ConVar::new("timescale", "timescale <value> - game speed", "1")
///         .save_on_change(true));
///
///     console.register_cmd(ConCommand::new("noclip", |_, world| {
///         world.resource_mut::<ConsoleOutput>().info("noclip toggled");
///         true
///     }).help("noclip - fly through walls"));
///
///     let speed = console.get_float("timescale").unwrap_or(1.0);
///     console.info(format!("running at {speed}x"));
/// }
/// ```
#[derive(SystemParam)]
pub struct Console<'w> {
    registry: ResMut<'w, ConsoleRegistry>,
    output: ResMut<'w, ConsoleOutput>,
    bindings: ResMut<'w, KeyBindings>,
}

impl Console<'_> {
    /// Register a console variable.
    ///
    /// Returns `true` if newly registered, `false` if it replaced an existing entry.
    pub fn register_var(&mut self, var: ConVar) -> bool {
        self.registry.register_var(var)
    }

    /// Register a console command.
    ///
    /// Returns `true` if newly registered, `false` if it replaced an existing entry.
    pub fn register_cmd(&mut self, cmd: impl ConsoleCommand) -> bool {
        self.registry.register_cmd(cmd)
    }

    /// Get a variable by name.
    pub fn var(&self, name: &str) -> Option<&ConVar> {
        self.registry.var(name)
    }

    /// Get a variable's value as text.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.registry.var(name).map(ConVar::as_str)
    }

    /// Get a variable's value as a float.
    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.registry.var(name).map(ConVar::as_float)
    }

    /// Get a variable's value as an integer.
    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.registry.var(name).map(ConVar::as_int)
    }

    /// Get a variable's value as a bool.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.registry.var(name).map(ConVar::as_bool)
    }

    /// Set a variable from text.
    ///
    /// Returns `false` if the variable doesn't exist or the text is empty.
    pub fn set_string(&mut self, name: &str, value: &str) -> bool {
        self.registry.vars_mut().set_string(name, value)
    }

    /// Set a variable from a float.
    pub fn set_float(&mut self, name: &str, value: f32) -> bool {
        self.registry.vars_mut().set_float(name, value)
    }

    /// Set a variable from an integer.
    pub fn set_int(&mut self, name: &str, value: i32) -> bool {
        self.registry.vars_mut().set_int(name, value)
    }

    /// Set a variable from a bool.
    pub fn set_bool(&mut self, name: &str, value: bool) -> bool {
        self.registry.vars_mut().set_bool(name, value)
    }

    /// Check if a command or variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Iterate over commands.
    pub fn cmds(&self) -> impl Iterator<Item = &CommandMeta> {
        self.registry.commands()
    }

    /// Iterate over variables.
    pub fn vars(&self) -> impl Iterator<Item = &ConVar> {
        self.registry.vars().iter()
    }

    /// Search commands and variables by name or help text.
    pub fn search(&self, query: &str) -> Vec<(&str, &str)> {
        self.registry.search(query)
    }

    /// Print a line.
    pub fn print(&mut self, text: impl AsRef<str>, level: OutputLevel) {
        self.output.print(text, level);
    }

    /// Print an info line.
    pub fn info(&mut self, text: impl AsRef<str>) {
        self.output.info(text);
    }

    /// Print a warning line.
    pub fn warn(&mut self, text: impl AsRef<str>) {
        self.output.warn(text);
    }

    /// Print an error line.
    pub fn error(&mut self, text: impl AsRef<str>) {
        self.output.error(text);
    }

    /// Bind a command line to an input. An empty command unbinds.
    pub fn bind(&mut self, input: BindInput, command: impl Into<String>) {
        self.bindings.set_bind(input, command);
    }

    /// The command bound to an input, or `""`.
    pub fn get_bind(&self, input: BindInput) -> &str {
        self.bindings.get_bind(input)
    }

    /// Get read-only access to the underlying registry.
    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }

    /// Get read-only access to the key bindings.
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }
}

/// Read-only console system parameter.
///
/// Use this when you only need to read console values. It does not conflict
/// with other readers in Bevy's scheduler.
#[derive(SystemParam)]
pub struct ConsoleRef<'w> {
    registry: Res<'w, ConsoleRegistry>,
    bindings: Res<'w, KeyBindings>,
}

impl ConsoleRef<'_> {
    /// Get a variable by name.
    pub fn var(&self, name: &str) -> Option<&ConVar> {
        self.registry.var(name)
    }

    /// Get a variable's value as text.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.registry.var(name).map(ConVar::as_str)
    }

    /// Get a variable's value as a float.
    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.registry.var(name).map(ConVar::as_float)
    }

    /// Get a variable's value as an integer.
    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.registry.var(name).map(ConVar::as_int)
    }

    /// Get a variable's value as a bool.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.registry.var(name).map(ConVar::as_bool)
    }

    /// Check if a command or variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// The command bound to an input, or `""`.
    pub fn get_bind(&self, input: BindInput) -> &str {
        self.bindings.get_bind(input)
    }

    /// Get read-only access to the underlying registry.
    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }
}
