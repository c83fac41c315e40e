//! Console command implementation.
//!
//! Commands are named handlers executed with the arguments of one statement.
//! Implement [`ConsoleCommand`] for stateful commands, or build a
//! [`ConCommand`] from closures.

use bevy::prelude::*;

/// Arguments passed to a command handler.
#[derive(Debug, Clone, Copy)]
pub struct CommandArgs<'a> {
    /// The command name as typed.
    name: &'a str,
    /// Parsed arguments (excluding command name).
    args: &'a [String],
}

impl<'a> CommandArgs<'a> {
    /// Create new command args from the typed name and its arguments.
    pub fn new(name: &'a str, args: &'a [String]) -> Self {
        Self { name, args }
    }

    /// The command name as typed by the user.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Get the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get an argument by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).map(String::as_str)
    }

    /// Get an argument or a default value.
    #[inline]
    pub fn get_or(&self, index: usize, default: &'a str) -> &'a str {
        self.get(index).unwrap_or(default)
    }

    /// Try to parse an argument as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|s| s.parse().ok())
    }

    /// Get all arguments as a slice.
    #[inline]
    pub fn as_slice(&self) -> &'a [String] {
        self.args
    }

    /// Iterate over arguments.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> {
        self.args.iter().map(String::as_str)
    }

    /// Join all arguments with a separator.
    pub fn join(&self, separator: &str) -> String {
        self.args.join(separator)
    }

    /// Join arguments starting from an index.
    pub fn join_from(&self, start: usize, separator: &str) -> String {
        self.args.get(start..).unwrap_or(&[]).join(separator)
    }
}

impl std::ops::Index<usize> for CommandArgs<'_> {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.args[index]
    }
}

/// An executable console command.
///
/// Commands report problems with their arguments by printing to
/// [`ConsoleOutput`](super::ConsoleOutput) and returning `false`; they never
/// panic on bad input.
pub trait ConsoleCommand: Send + Sync + 'static {
    /// The name typed to invoke the command.
    fn name(&self) -> &str;

    /// One-line usage and description, shown by `help`.
    fn help_text(&self) -> &str;

    /// Run the command. Returns `true` on success.
    fn execute(&mut self, args: &CommandArgs, world: &mut World) -> bool;

    /// Candidates for the last argument in `args`.
    ///
    /// `args` excludes the command name and ends with the token currently
    /// being typed, which is empty right after a space. `None` means no
    /// suggestions.
    fn autocomplete(&self, _args: &[String], _world: &World) -> Option<Vec<String>> {
        None
    }
}

/// Type alias for closure command handlers.
pub type CommandHandler = Box<dyn FnMut(&CommandArgs, &mut World) -> bool + Send + Sync>;

/// Type alias for closure autocomplete providers.
pub type AutocompleteProvider = Box<dyn Fn(&[String], &World) -> Option<Vec<String>> + Send + Sync>;

/// A console command backed by closures.
///
/// # Examples
///
/// ```ignore
/// let echo = ConCommand::new("echo", |args, world| {
///     world.resource_mut::<ConsoleOutput>().info(args.join(" "));
///     true
/// })
/// .help("echo <text> - prints text to the console");
/// ```
pub struct ConCommand {
    name: Box<str>,
    help: Box<str>,
    handler: CommandHandler,
    autocomplete: Option<AutocompleteProvider>,
}

impl ConCommand {
    /// Create a new command with the given name and handler.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: FnMut(&CommandArgs, &mut World) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            help: "".into(),
            handler: Box::new(handler),
            autocomplete: None,
        }
    }

    /// Set the help text.
    pub fn help(mut self, help: impl Into<Box<str>>) -> Self {
        self.help = help.into();
        self
    }

    /// Set the autocomplete provider.
    pub fn autocomplete<F>(mut self, provider: F) -> Self
    where
        F: Fn(&[String], &World) -> Option<Vec<String>> + Send + Sync + 'static,
    {
        self.autocomplete = Some(Box::new(provider));
        self
    }

    /// Check if this command has an autocomplete provider.
    #[inline]
    pub fn has_autocomplete(&self) -> bool {
        self.autocomplete.is_some()
    }
}

impl ConsoleCommand for ConCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn help_text(&self) -> &str {
        &self.help
    }

    fn execute(&mut self, args: &CommandArgs, world: &mut World) -> bool {
        (self.handler)(args, world)
    }

    fn autocomplete(&self, args: &[String], world: &World) -> Option<Vec<String>> {
        self.autocomplete.as_ref().and_then(|f| f(args, world))
    }
}

impl std::fmt::Debug for ConCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConCommand")
            .field("name", &self.name)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

/// Filter `options` down to those starting with `partial`, ignoring case.
///
/// Helper for autocomplete providers.
pub fn complete_from<'a>(
    partial: &str,
    options: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let partial = partial.to_lowercase();
    options
        .into_iter()
        .filter(|option| option.to_lowercase().starts_with(&partial))
        .map(str::to_string)
        .collect()
}
