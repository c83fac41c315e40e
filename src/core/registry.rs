//! Console registry for commands and variables.
//!
//! Commands are kept in registration order. Their handlers are stored in
//! slots that are emptied while the command runs, so a handler can receive
//! `&mut World` (which contains this registry) without borrow conflicts.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use bevy::prelude::*;

use super::{
    CommandArgs, ConVar, ConsoleCommand, ConsoleOutput, OutputLevel, ParsedStatement,
    VariableStore, parse,
};

/// Metadata of a registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMeta {
    name: Box<str>,
    help: Box<str>,
}

impl CommandMeta {
    /// The command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command help text.
    #[inline]
    pub fn help_text(&self) -> &str {
        &self.help
    }
}

struct CommandSlot {
    meta: CommandMeta,
    handler: Option<Box<dyn ConsoleCommand>>,
}

/// Result of looking up a name in the registry.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// A command.
    Command(&'a CommandMeta),
    /// A variable.
    Variable(&'a ConVar),
    /// Nothing with that name.
    NotFound,
}

/// Central registry for console commands and variables.
///
/// Names are unique across both kinds, ignoring case.
///
/// # Examples
///
/// ```ignore
/// let mut registry = ConsoleRegistry::new();
///
/// registry.register_var(ConVar::new("timescale", "timescale <value>", "1").save_on_change(true));
/// registry.register_cmd(ConCommand::new("noclip", |_, world| {
///     world.resource_mut::<ConsoleOutput>().info("noclip toggled");
///     true
/// }));
///
/// assert!(matches!(registry.resolve("TIMESCALE"), Resolved::Variable(_)));
/// ```
#[derive(Resource, Default)]
pub struct ConsoleRegistry {
    commands: Vec<CommandSlot>,
    index: HashMap<String, usize>,
    vars: VariableStore,
}

impl ConsoleRegistry {
    /// Create a new empty registry with an in-memory variable store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry around an existing variable store.
    pub fn with_vars(vars: VariableStore) -> Self {
        Self {
            vars,
            ..Self::default()
        }
    }

    /// Register a command.
    ///
    /// Returns `true` if newly registered, `false` if it replaced an existing
    /// command or variable. A warning is logged if a duplicate is detected.
    pub fn register_cmd(&mut self, cmd: impl ConsoleCommand) -> bool {
        self.register_boxed(Box::new(cmd))
    }

    /// Register a boxed command.
    pub fn register_boxed(&mut self, cmd: Box<dyn ConsoleCommand>) -> bool {
        let meta = CommandMeta {
            name: cmd.name().into(),
            help: cmd.help_text().into(),
        };
        let key = meta.name.to_lowercase();

        if self.vars.remove(&meta.name).is_some() {
            warn!(
                "Console: Overwriting existing variable '{}' with new command",
                meta.name
            );
            self.commands_push(key, meta, cmd);
            return false;
        }

        match self.index.get(&key) {
            Some(&idx) => {
                warn!("Console: Overwriting existing entry '{}' with new command", meta.name);
                self.commands[idx] = CommandSlot {
                    meta,
                    handler: Some(cmd),
                };
                false
            }
            None => {
                self.commands_push(key, meta, cmd);
                true
            }
        }
    }

    fn commands_push(&mut self, key: String, meta: CommandMeta, cmd: Box<dyn ConsoleCommand>) {
        self.index.insert(key, self.commands.len());
        self.commands.push(CommandSlot {
            meta,
            handler: Some(cmd),
        });
    }

    /// Register a variable.
    ///
    /// Returns `true` if newly registered, `false` if it replaced an existing
    /// command or variable.
    pub fn register_var(&mut self, var: ConVar) -> bool {
        let replaced_cmd = self.remove_cmd(var.name());
        if replaced_cmd {
            warn!(
                "Console: Overwriting existing command '{}' with new variable",
                var.name()
            );
        }
        self.vars.register(var) && !replaced_cmd
    }

    /// Remove a command. Returns `true` if it existed.
    pub fn remove_cmd(&mut self, name: &str) -> bool {
        let Some(idx) = self.index.remove(&name.to_lowercase()) else {
            return false;
        };
        self.commands.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        true
    }

    /// Look up a name, ignoring case. Commands take priority.
    pub fn resolve(&self, name: &str) -> Resolved<'_> {
        if let Some(meta) = self.command(name) {
            return Resolved::Command(meta);
        }
        match self.vars.get(name) {
            Some(var) => Resolved::Variable(var),
            None => Resolved::NotFound,
        }
    }

    /// Get a command's metadata by name.
    pub fn command(&self, name: &str) -> Option<&CommandMeta> {
        self.index
            .get(&name.to_lowercase())
            .map(|&idx| &self.commands[idx].meta)
    }

    /// Get a variable by name.
    pub fn var(&self, name: &str) -> Option<&ConVar> {
        self.vars.get(name)
    }

    /// The variable store.
    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    /// Mutable access to the variable store.
    pub fn vars_mut(&mut self) -> &mut VariableStore {
        &mut self.vars
    }

    /// Check if a command or variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase()) || self.vars.contains(name)
    }

    /// Help text of a command or variable.
    pub fn help_text(&self, name: &str) -> Option<&str> {
        match self.resolve(name) {
            Resolved::Command(meta) => Some(meta.help_text()),
            Resolved::Variable(var) => Some(var.help_text()),
            Resolved::NotFound => None,
        }
    }

    /// Iterate over commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandMeta> {
        self.commands.iter().map(|slot| &slot.meta)
    }

    /// Number of commands plus variables.
    pub fn len(&self) -> usize {
        self.commands.len() + self.vars.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Completion candidates for a partially typed name.
    ///
    /// Command names first, then `"<name> <value>"` for variables, each in
    /// registration order.
    pub fn name_candidates(&self, partial: &str) -> Vec<String> {
        let partial = partial.to_lowercase();
        let commands = self
            .commands()
            .filter(|meta| meta.name.to_lowercase().starts_with(&partial))
            .map(|meta| meta.name.to_string());
        let vars = self
            .vars
            .with_prefix(&partial)
            .map(|var| format!("{} {}", var.name(), var.as_str()));
        commands.chain(vars).collect()
    }

    /// Ask a command for argument candidates.
    ///
    /// Returns `None` for unknown commands and commands that are currently
    /// running.
    pub fn complete_args(&self, name: &str, args: &[String], world: &World) -> Option<Vec<String>> {
        let idx = *self.index.get(&name.to_lowercase())?;
        self.commands[idx]
            .handler
            .as_ref()
            .and_then(|handler| handler.autocomplete(args, world))
    }

    /// Commands and variables whose name or help text contains `query`,
    /// ignoring case. Returns `(name, help)` pairs sorted by name.
    pub fn search(&self, query: &str) -> Vec<(&str, &str)> {
        let query = query.to_lowercase();
        let mut matches: Vec<_> = self
            .commands()
            .map(|meta| (meta.name(), meta.help_text()))
            .chain(self.vars.iter().map(|var| (var.name(), var.help_text())))
            .filter(|(name, help)| {
                name.to_lowercase().contains(&query) || help.to_lowercase().contains(&query)
            })
            .collect();

        matches.sort_by(|a, b| a.0.cmp(b.0));
        matches
    }

    /// Take a command handler out for execution.
    ///
    /// Use [`put_handler`](Self::put_handler) to return it.
    pub fn take_handler(&mut self, name: &str) -> Option<Box<dyn ConsoleCommand>> {
        let idx = *self.index.get(&name.to_lowercase())?;
        self.commands[idx].handler.take()
    }

    /// Put a handler back after execution.
    ///
    /// Dropped if the command was removed or replaced in the meantime.
    pub fn put_handler(&mut self, name: &str, handler: Box<dyn ConsoleCommand>) {
        let Some(&idx) = self.index.get(&name.to_lowercase()) else {
            return;
        };
        let slot = &mut self.commands[idx].handler;
        if slot.is_none() {
            *slot = Some(handler);
        }
    }
}

impl std::fmt::Debug for ConsoleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleRegistry")
            .field("commands", &self.commands().collect::<Vec<_>>())
            .field("vars", &self.vars)
            .finish()
    }
}

/// Print to the world's [`ConsoleOutput`], if there is one.
pub fn print(world: &mut World, text: impl AsRef<str>, level: OutputLevel) {
    if let Some(mut output) = world.get_resource_mut::<ConsoleOutput>() {
        output.print(text, level);
    }
}

/// Execute a command line against the world's [`ConsoleRegistry`].
///
/// Every statement is run in order; unknown names print an error and
/// execution continues. Returns the number of statements that succeeded.
///
/// Commands may call this recursively. A command that is already running
/// cannot be re-entered and reports an error instead.
pub fn execute_line(world: &mut World, raw: &str) -> usize {
    let sequence = parse(raw);
    sequence
        .iter()
        .filter(|statement| execute_statement(world, statement))
        .count()
}

enum Target {
    Command,
    Variable,
    NotFound,
}

fn execute_statement(world: &mut World, statement: &ParsedStatement) -> bool {
    let name = statement.name();
    let args = statement.args();

    let target = match world.get_resource::<ConsoleRegistry>() {
        Some(registry) => match registry.resolve(name) {
            Resolved::Command(_) => Target::Command,
            Resolved::Variable(_) => Target::Variable,
            Resolved::NotFound => Target::NotFound,
        },
        None => Target::NotFound,
    };

    match target {
        Target::Command => run_command(world, name, args),
        Target::Variable => match args.first() {
            Some(value) => world
                .resource_mut::<ConsoleRegistry>()
                .vars_mut()
                .set_string(name, value),
            None => {
                let line = world
                    .resource::<ConsoleRegistry>()
                    .var(name)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                print(world, line, OutputLevel::Info);
                true
            }
        },
        Target::NotFound => {
            print(world, format!("Unknown command: {}", name), OutputLevel::Error);
            false
        }
    }
}

fn run_command(world: &mut World, name: &str, args: &[String]) -> bool {
    let taken = world.resource_mut::<ConsoleRegistry>().take_handler(name);
    let Some(mut handler) = taken else {
        print(
            world,
            format!("Command '{}' is already running", name),
            OutputLevel::Error,
        );
        return false;
    };

    let command_args = CommandArgs::new(name, args);
    let result = panic::catch_unwind(AssertUnwindSafe(|| handler.execute(&command_args, world)));

    world
        .resource_mut::<ConsoleRegistry>()
        .put_handler(name, handler);

    match result {
        Ok(success) => success,
        Err(_) => {
            error!("Console: Command '{}' panicked", name);
            print(
                world,
                format!("Command '{}' failed unexpectedly", name),
                OutputLevel::Error,
            );
            false
        }
    }
}
