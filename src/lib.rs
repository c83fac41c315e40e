//! An in-game developer console for Bevy.
//!
//! bevy_dev_console provides:
//!
//! - **Command line**: `;`-separated statements with `"quoted arguments"`
//! - **ConVar**: Named runtime settings with optional clamping and persistence
//! - **ConCommand**: Console commands with handlers and autocompletion
//! - **Key bindings**: Run a command line when a key or gamepad button is pressed
//! - **Console**: Unified system parameter for convenient access
//!
//! # Features
//!
//! - `ron` (default): console settings from a RON file
//! - `capture-log`: mirror `tracing` log events into the console output
//! - `terminal`: stdin/stdout backend for headless builds
//! - `full`: Enable ron + capture-log
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_dev_console::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin)
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: Console) {
//!     // Register a variable, saved to disk whenever it changes
//!     console.register_var(ConVar::new("timescale", "timescale <value> - game speed", "1")
//!         .save_on_change(true));
//!
//!     // Register a command
//!     console.register_cmd(ConCommand::new("noclip", |_, world| {
//!         world.resource_mut::<ConsoleOutput>().info("noclip toggled");
//!         true
//!     }).help("noclip - fly through walls"));
//!
//!     // Bind it to a key
//!     console.bind(BindInput::Key(KeyCode::KeyN), "noclip");
//! }
//! ```
//!
//! The console does not draw itself. Implement [`ConsoleCanvas`] for your
//! renderer and call [`draw_console`] with a [`ConsoleView`] each frame.

use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod persist;
pub mod ui;

#[cfg(feature = "capture-log")]
pub mod logging;

#[cfg(feature = "terminal")]
pub mod terminal;

pub use config::{ConsoleConfig, GlyphFilter, printable_glyph};
pub use crate::core::{
    Autocompletion, BindInput, BindParseError, CommandArgs, CommandMeta, ConCommand, ConVar,
    ConVarChangedEvent, Console, ConsoleCommand, ConsoleEventsPlugin, ConsoleInput,
    ConsoleInputEvent, ConsoleOutput, ConsoleOutputEvent, ConsoleRef, ConsoleRegistry,
    ConsoleState, ConsoleToggleEvent, KeyBindings, LineEditor, OutputLevel, OutputLine,
    ParsedSequence, ParsedStatement, Resolved, VariableStore, console_closed, execute_line, parse,
    parse_relative, parse_relative_vec3, print,
};
pub use persist::PersistError;
pub use ui::{ConsoleCanvas, ConsoleEdits, ConsoleView, EditAction, draw_console};

#[cfg(feature = "ron")]
pub use persist::{ConsoleConfigFile, DEFAULT_SETTINGS_FILE};

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::ConsoleConfig;
    pub use crate::core::{
        BindInput, CommandArgs, ConCommand, ConVar, ConVarChangedEvent, Console, ConsoleCommand,
        ConsoleInputEvent, ConsoleOutput, ConsoleOutputEvent, ConsoleRef, ConsoleRegistry,
        ConsoleState, ConsoleToggleEvent, KeyBindings, OutputLevel, console_closed, execute_line,
        parse_relative, parse_relative_vec3,
    };
    pub use crate::ui::{ConsoleCanvas, ConsoleView, draw_console};
    pub use crate::ConsolePlugin;
}

/// Main console plugin.
///
/// Insert a [`ConsoleConfig`] before adding the plugin to change the defaults.
/// The plugin expects Bevy's input resources (`ButtonInput<KeyCode>` and the
/// `KeyboardInput` message), which `DefaultPlugins` provides.
#[derive(Default)]
pub struct ConsolePlugin;

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConsoleConfig>()
            .init_resource::<ConsoleRegistry>()
            .init_resource::<ConsoleOutput>()
            .init_resource::<KeyBindings>()
            .init_resource::<ConsoleState>()
            .init_resource::<ConsoleInput>()
            .init_resource::<ConsoleEdits>()
            .init_resource::<PendingConsole>()
            .add_plugins(ConsoleEventsPlugin);

        // Files are attached before Startup so registration applies saved values
        app.add_systems(PreStartup, load_console_files)
            .add_systems(Startup, register_builtin_commands);

        // 1. Gather input: toggle key, prompt keys, bindings, messages
        // 2. process_console: apply edits and run lines with exclusive World access
        // 3. send_pending_messages: variable changes and toggles
        app.add_systems(
            Update,
            (
                ui::toggle_console,
                ui::capture_keyboard,
                ui::trigger_bindings.pipe(queue_lines),
                read_console_messages,
                process_console,
                send_pending_messages,
                ui::tick_cursor,
            )
                .chain(),
        );

        #[cfg(feature = "terminal")]
        {
            app.add_plugins(terminal::TerminalPlugin);
        }
    }
}

/// Work produced during the frame and consumed by the exclusive system.
#[derive(Resource, Default)]
struct PendingConsole {
    lines: Vec<String>,
    toggles: Vec<bool>,
}

/// Apply [`ConsoleConfig`] and attach the persisted files.
fn load_console_files(
    config: Res<ConsoleConfig>,
    mut registry: ResMut<ConsoleRegistry>,
    mut output: ResMut<ConsoleOutput>,
    mut bindings: ResMut<KeyBindings>,
) {
    output.set_capacity(config.output_capacity);

    if let Some(path) = config.vars_path() {
        registry.vars_mut().attach_file(path);
    }
    if let Some(path) = config.binds_path() {
        bindings.attach_file(path);
    }
}

fn queue_lines(In(lines): In<Vec<String>>, mut pending: ResMut<PendingConsole>) {
    pending.lines.extend(lines);
}

/// Read the host's console messages.
fn read_console_messages(
    mut input_events: MessageReader<ConsoleInputEvent>,
    mut output_events: MessageReader<ConsoleOutputEvent>,
    mut output: ResMut<ConsoleOutput>,
    mut pending: ResMut<PendingConsole>,
) {
    for event in output_events.read() {
        output.print(&event.message, event.level);
    }
    for event in input_events.read() {
        pending.lines.push(event.command.clone());
    }
}

/// Exclusive system that applies prompt edits and executes queued lines.
fn process_console(world: &mut World) {
    let edits = std::mem::take(&mut world.resource_mut::<ConsoleEdits>().0);
    for line in ui::apply_edits(world, edits) {
        print(world, format!("> {}", line), OutputLevel::Echo);
        execute_line(world, &line);
    }

    let lines = std::mem::take(&mut world.resource_mut::<PendingConsole>().lines);
    for line in lines {
        execute_line(world, &line);
    }
}

/// System that sends queued messages.
fn send_pending_messages(
    mut pending: ResMut<PendingConsole>,
    mut registry: ResMut<ConsoleRegistry>,
    mut change_events: MessageWriter<ConVarChangedEvent>,
    mut toggle_events: MessageWriter<ConsoleToggleEvent>,
) {
    for change in registry.bypass_change_detection().vars_mut().drain_changes() {
        change_events.write(change);
    }
    for open in pending.toggles.drain(..) {
        toggle_events.write(ConsoleToggleEvent { open });
    }
}

/// Register built-in console commands.
fn register_builtin_commands(mut registry: ResMut<ConsoleRegistry>) {
    registry.register_cmd(
        ConCommand::new("help", |args, world| {
            let page_size = world
                .get_resource::<ConsoleConfig>()
                .map_or(10, |config| config.help_page_size);
            let lines = help_lines(world.resource::<ConsoleRegistry>(), args.get(0), page_size);

            match lines {
                Ok(lines) => {
                    for line in lines {
                        print(world, line, OutputLevel::Info);
                    }
                    true
                }
                Err(message) => {
                    print(world, message, OutputLevel::Warning);
                    false
                }
            }
        })
        .help("help [page/command] - displays given page of help or tooltip for given command"),
    );

    registry.register_cmd(
        ConCommand::new("clear", |_args, world| {
            world.resource_mut::<ConsoleOutput>().clear();
            true
        })
        .help("clear - clears console output"),
    );

    registry.register_cmd(
        ConCommand::new("toggleconsole", |_args, world| {
            let open = world.resource_mut::<ConsoleState>().toggle();
            world.resource_mut::<PendingConsole>().toggles.push(open);
            true
        })
        .help("toggleconsole - toggles displaying the console"),
    );

    registry.register_cmd(
        ConCommand::new("bind", bind_command)
            .help("bind <key> [command] - binds a command to specified key")
            .autocomplete(complete_bind),
    );

    registry.register_cmd(
        ConCommand::new("unbind", unbind_command)
            .help("unbind <key> - unbinds specified key")
            .autocomplete(|args, _world| match args {
                [key] => Some(crate::core::complete_key_name(key)),
                _ => None,
            }),
    );

    registry.register_cmd(
        ConCommand::new("echo", |args, world| {
            print(world, args.join(" "), OutputLevel::Info);
            true
        })
        .help("echo <text> - prints text to the console"),
    );

    registry.register_cmd(
        ConCommand::new("find", |args, world| {
            let Some(query) = args.get(0) else {
                print(world, "Usage: find <text>", OutputLevel::Warning);
                return false;
            };

            let registry = world.resource::<ConsoleRegistry>();
            let mut lines: Vec<String> = registry
                .search(query)
                .into_iter()
                .map(|(name, help)| {
                    let kind = if registry.command(name).is_some() { "cmd" } else { "var" };
                    if help.is_empty() {
                        format!("[{}] {}", kind, name)
                    } else {
                        format!("[{}] {}", kind, help)
                    }
                })
                .collect();
            lines.push(format!("{} results", lines.len()));

            for line in lines {
                print(world, line, OutputLevel::Info);
            }
            true
        })
        .help("find <text> - searches commands and variables by name or description"),
    );

    registry.register_cmd(
        ConCommand::new("cvarlist", |args, world| {
            let registry = world.resource::<ConsoleRegistry>();
            let mut lines: Vec<String> = registry
                .vars()
                .with_prefix(args.get_or(0, ""))
                .map(|var| {
                    let modified = if var.is_modified() { "*" } else { "" };
                    format!("{}{} = \"{}\"", var.name(), modified, var.as_str())
                })
                .collect();
            lines.push(format!("{} convars", lines.len()));

            for line in lines {
                print(world, line, OutputLevel::Info);
            }
            true
        })
        .help("cvarlist [prefix] - lists console variables, * marks modified ones"),
    );
}

/// Lines printed by `help`: a page of the command list, or one command's help.
fn help_lines(
    registry: &ConsoleRegistry,
    arg: Option<&str>,
    page_size: usize,
) -> Result<Vec<String>, String> {
    let page = match arg {
        None => 1,
        Some(arg) => match arg.parse::<i64>() {
            Ok(page) => page,
            Err(_) => {
                return match registry.resolve(arg) {
                    Resolved::Command(meta) => Ok(vec![help_or_name(meta.help_text(), meta.name())]),
                    Resolved::Variable(var) => Ok(vec![help_or_name(var.help_text(), var.name())]),
                    Resolved::NotFound => Err(format!("Command \"{}\" hasn't been found.", arg)),
                };
            }
        },
    };

    let page_size = page_size.max(1);
    let commands: Vec<&CommandMeta> = registry.commands().collect();
    let page_count = commands.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, page_count as i64) as usize;

    let mut lines = vec![format!("=== Help - page {}/{} ===", page, page_count)];
    lines.extend(
        commands
            .iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .map(|meta| help_or_name(meta.help_text(), meta.name())),
    );
    Ok(lines)
}

fn help_or_name(help: &str, name: &str) -> String {
    if help.is_empty() { name } else { help }.to_string()
}

/// Parse the key argument of `bind`/`unbind`, printing a warning on failure.
fn parse_key_arg(world: &mut World, name: &str) -> Option<BindInput> {
    match name.parse::<BindInput>() {
        Ok(input) => Some(input),
        Err(e) => {
            print(world, format!("{}.", e), OutputLevel::Warning);
            None
        }
    }
}

fn bind_command(args: &CommandArgs, world: &mut World) -> bool {
    if args.is_empty() || args.len() > 2 {
        print(
            world,
            format!("Incorrect number of parameters: '{}'", args.len()),
            OutputLevel::Warning,
        );
        return false;
    }

    let Some(input) = parse_key_arg(world, &args[0]) else {
        return false;
    };

    let message = {
        let mut bindings = world.resource_mut::<KeyBindings>();
        match args.get(1) {
            None => match bindings.get_bind(input) {
                "" => format!("No command has been bound to key {}.", input),
                bound => format!("Key {} is bound to command \"{}\".", input, bound),
            },
            Some(command) => {
                bindings.set_bind(input, command);
                if command.is_empty() {
                    format!("Key {} has been unbound.", input)
                } else {
                    format!("Command has been bound to key {}.", input)
                }
            }
        }
    };

    print(world, message, OutputLevel::Info);
    true
}

fn unbind_command(args: &CommandArgs, world: &mut World) -> bool {
    if args.len() != 1 {
        print(
            world,
            format!("Incorrect number of parameters: '{}'", args.len()),
            OutputLevel::Warning,
        );
        return false;
    }

    let Some(input) = parse_key_arg(world, &args[0]) else {
        return false;
    };

    let was_bound = {
        let mut bindings = world.resource_mut::<KeyBindings>();
        let was_bound = bindings.has_bind(input);
        if was_bound {
            bindings.set_bind(input, "");
        }
        was_bound
    };

    let message = if was_bound {
        format!("Key {} has been unbound.", input)
    } else {
        format!("No command has been bound to key {}.", input)
    };
    print(world, message, OutputLevel::Info);
    was_bound
}

/// Key names for the first argument, the current binding for the second.
fn complete_bind(args: &[String], world: &World) -> Option<Vec<String>> {
    match args {
        [key] => Some(crate::core::complete_key_name(key)),
        [key, typed] => {
            let input = key.parse::<BindInput>().ok()?;
            let bound = world.get_resource::<KeyBindings>()?.get_bind(input);
            let matches = !bound.is_empty() && bound.to_lowercase().starts_with(&typed.to_lowercase());
            matches.then(|| vec![crate::core::quote(bound)])
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::input::keyboard::KeyboardInput;
    use tempfile::tempdir;

    /// Test resource to track command execution.
    #[derive(Resource, Default)]
    struct TestCommandExecuted {
        count: usize,
        last_args: Vec<String>,
    }

    /// Collected variable change messages.
    #[derive(Resource, Default)]
    struct SeenChanges(Vec<ConVarChangedEvent>);

    fn test_app_with(config: ConsoleConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .add_message::<KeyboardInput>()
            .insert_resource(config)
            .add_plugins(ConsolePlugin);
        app
    }

    fn test_app() -> App {
        test_app_with(ConsoleConfig::in_memory())
    }

    /// Queue a command line directly, like a binding would.
    fn queue_command(app: &mut App, line: &str) {
        app.world_mut()
            .resource_mut::<PendingConsole>()
            .lines
            .push(line.to_string());
    }

    fn run(app: &mut App, line: &str) {
        queue_command(app, line);
        app.update();
    }

    fn output_lines(app: &App) -> Vec<String> {
        app.world()
            .resource::<ConsoleOutput>()
            .iter()
            .rev()
            .map(|line| line.text.clone())
            .collect()
    }

    fn press(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
        app.update();
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release(key);
        keys.clear();
    }

    #[test]
    fn test_command_execution() {
        let mut app = test_app();
        app.init_resource::<TestCommandExecuted>();

        app.add_systems(Startup, |mut console: Console| {
            console.register_cmd(
                ConCommand::new("test_cmd", |args, world| {
                    let mut tracker = world.resource_mut::<TestCommandExecuted>();
                    tracker.count += 1;
                    tracker.last_args = args.iter().map(|s| s.to_string()).collect();
                    true
                })
                .help("test_cmd - test command"),
            );
        });

        // Run startup
        app.update();

        run(&mut app, "test_cmd arg1 \"arg 2\"");

        let tracker = app.world().resource::<TestCommandExecuted>();
        assert_eq!(tracker.count, 1, "Command should have been executed once");
        assert_eq!(tracker.last_args, vec!["arg1", "arg 2"]);
    }

    #[test]
    fn test_convar_get_set_via_input() {
        let mut app = test_app();
        app.add_systems(Startup, |mut console: Console| {
            console.register_var(ConVar::new("test_var", "test_var <value>", "42"));
        });
        app.update();

        run(&mut app, "test_var");
        assert_eq!(output_lines(&app), ["test_var = 42"]);

        run(&mut app, "TEST_VAR 100");
        let registry = app.world().resource::<ConsoleRegistry>();
        assert_eq!(registry.var("test_var").map(ConVar::as_int), Some(100));
    }

    #[test]
    fn test_input_message() {
        let mut app = test_app();
        app.update();

        app.world_mut().write_message(ConsoleInputEvent::new("echo from message"));
        app.world_mut()
            .write_message(ConsoleOutputEvent::warn("printed directly"));
        app.update();

        let output = app.world().resource::<ConsoleOutput>();
        let lines: Vec<_> = output.iter().rev().map(|l| (l.text.as_str(), l.level)).collect();
        assert_eq!(
            lines,
            [
                ("printed directly", OutputLevel::Warning),
                ("from message", OutputLevel::Info),
            ]
        );
    }

    #[test]
    fn test_multiple_statements_and_unknown() {
        let mut app = test_app();
        app.update();

        run(&mut app, "echo one; nope 1; echo \"two; three\"");
        assert_eq!(output_lines(&app), ["one", "Unknown command: nope", "two; three"]);

        let output = app.world().resource::<ConsoleOutput>();
        assert_eq!(output.iter().nth(1).map(|l| l.level), Some(OutputLevel::Error));
    }

    #[test]
    fn test_convar_changed_event() {
        let mut app = test_app();
        app.init_resource::<SeenChanges>();
        app.add_systems(Startup, |mut console: Console| {
            console.register_var(ConVar::new("volume", "volume <0-10>", "5").min(0).max(10));
        });
        app.add_systems(
            PostUpdate,
            |mut changes: MessageReader<ConVarChangedEvent>, mut seen: ResMut<SeenChanges>| {
                seen.0.extend(changes.read().cloned());
            },
        );
        app.update();

        run(&mut app, "volume 50");

        let seen = &app.world().resource::<SeenChanges>().0;
        assert_eq!(seen, &[ConVarChangedEvent::new("volume", "5", "10")]);
    }

    #[test]
    fn test_builtin_help_paging() {
        let mut app = test_app_with(ConsoleConfig {
            help_page_size: 3,
            ..ConsoleConfig::in_memory()
        });
        app.update();

        // 8 built-in commands on pages of 3
        run(&mut app, "help 2");
        assert_eq!(
            output_lines(&app),
            [
                "=== Help - page 2/3 ===",
                "bind <key> [command] - binds a command to specified key",
                "unbind <key> - unbinds specified key",
                "echo <text> - prints text to the console",
            ]
        );

        run(&mut app, "clear; help 99");
        assert_eq!(output_lines(&app).len(), 3);
        assert_eq!(output_lines(&app)[0], "=== Help - page 3/3 ===");

        run(&mut app, "clear; help ECHO; help nothing");
        assert_eq!(
            output_lines(&app),
            [
                "echo <text> - prints text to the console",
                "Command \"nothing\" hasn't been found.",
            ]
        );
    }

    #[test]
    fn test_builtin_find_and_cvarlist() {
        let mut app = test_app();
        app.add_systems(Startup, |mut console: Console| {
            console.register_var(ConVar::new("fov", "fov <degrees> - field of view", "90"));
            console.register_var(ConVar::new("fps_max", "", "60"));
        });
        app.update();

        run(&mut app, "fov 100; find FIELD");
        assert_eq!(output_lines(&app), ["[var] fov <degrees> - field of view", "1 results"]);

        run(&mut app, "clear; cvarlist f");
        assert_eq!(output_lines(&app), ["fov* = \"100\"", "fps_max = \"60\"", "2 convars"]);
    }

    #[test]
    fn test_bind_command_and_trigger() {
        let mut app = test_app();
        app.update();

        run(&mut app, "bind F1 \"echo pressed\"");
        assert_eq!(output_lines(&app), ["Command has been bound to key F1."]);

        run(&mut app, "clear; bind f1");
        assert_eq!(output_lines(&app), ["Key F1 is bound to command \"echo pressed\"."]);

        run(&mut app, "clear");
        press(&mut app, KeyCode::F1);
        assert_eq!(output_lines(&app), ["pressed"]);

        // Bindings do not fire while the console is open
        run(&mut app, "clear; toggleconsole");
        press(&mut app, KeyCode::F1);
        assert!(output_lines(&app).is_empty());
    }

    #[test]
    fn test_bind_errors_and_unbind() {
        let mut app = test_app();
        app.update();

        run(&mut app, "bind; bind NotAKey echo; unbind G");
        assert_eq!(
            output_lines(&app),
            [
                "Incorrect number of parameters: '0'",
                "Invalid key: NotAKey.",
                "No command has been bound to key G.",
            ]
        );

        run(&mut app, "clear; bind G echo; unbind g");
        assert_eq!(
            output_lines(&app),
            ["Command has been bound to key G.", "Key G has been unbound."]
        );
        assert!(app.world().resource::<KeyBindings>().is_empty());
    }

    #[test]
    fn test_bind_autocomplete() {
        let mut app = test_app();
        app.update();
        run(&mut app, "bind F5 \"echo quick save\"");

        let world = app.world();
        let registry = world.resource::<ConsoleRegistry>();
        let args = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let keys = registry.complete_args("bind", &args(&["f1"]), world).unwrap();
        assert!(keys.contains(&"f1".to_string()));
        assert!(keys.contains(&"f12".to_string()));

        let current = registry.complete_args("bind", &args(&["f5", "ec"]), world);
        assert_eq!(current, Some(vec!["\"echo quick save\"".to_string()]));
        assert_eq!(registry.complete_args("bind", &args(&["f6", ""]), world), None);
    }

    #[test]
    fn test_toggle_key_and_prompt() {
        let mut app = test_app();
        app.update();

        press(&mut app, KeyCode::Backquote);
        assert!(app.world().resource::<ConsoleState>().is_open());

        {
            let mut edits = app.world_mut().resource_mut::<ConsoleEdits>();
            edits.type_text("echo typed");
            edits.push(EditAction::Submit);
        }
        app.update();

        let output = app.world().resource::<ConsoleOutput>();
        let lines: Vec<_> = output.iter().rev().map(|l| (l.text.as_str(), l.level)).collect();
        assert_eq!(lines, [("> echo typed", OutputLevel::Echo), ("typed", OutputLevel::Info)]);

        let input = app.world().resource::<ConsoleInput>();
        assert_eq!(input.editor.buffer(), "");
        assert_eq!(input.editor.history(), ["echo typed"]);

        press(&mut app, KeyCode::Backquote);
        assert!(!app.world().resource::<ConsoleState>().is_open());
    }

    #[test]
    fn test_toggleconsole_command_sends_message() {
        let mut app = test_app();
        app.init_resource::<SeenToggles>();
        app.add_systems(
            PostUpdate,
            |mut toggles: MessageReader<ConsoleToggleEvent>, mut seen: ResMut<SeenToggles>| {
                seen.0.extend(toggles.read().map(|t| t.open));
            },
        );
        app.update();

        run(&mut app, "toggleconsole");
        run(&mut app, "toggleconsole");
        assert_eq!(app.world().resource::<SeenToggles>().0, [true, false]);
    }

    #[derive(Resource, Default)]
    struct SeenToggles(Vec<bool>);

    #[test]
    fn test_persistence_across_runs() {
        let dir = tempdir().unwrap();
        let config = || ConsoleConfig {
            config_dir: Some(dir.path().to_path_buf()),
            ..default()
        };
        let register = |mut console: Console| {
            console.register_var(ConVar::new("sensitivity", "", "1").save_on_change(true));
            console.register_var(ConVar::new("scratch", "", "0"));
        };

        let mut app = test_app_with(config());
        app.add_systems(Startup, register);
        app.update();
        run(&mut app, "sensitivity 2.5; scratch 7; bind K \"echo hi; echo there\"");

        let mut app = test_app_with(config());
        app.add_systems(Startup, register);
        app.update();

        let console = app.world().resource::<ConsoleRegistry>();
        assert_eq!(console.var("sensitivity").map(ConVar::as_str), Some("2.5"));
        assert_eq!(console.var("scratch").map(ConVar::as_str), Some("0"));

        let bindings = app.world().resource::<KeyBindings>();
        assert_eq!(bindings.get_bind(BindInput::Key(KeyCode::KeyK)), "echo hi; echo there");
    }

    #[test]
    fn test_output_capacity_from_config() {
        let mut app = test_app_with(ConsoleConfig {
            output_capacity: 2,
            ..ConsoleConfig::in_memory()
        });
        app.update();

        run(&mut app, "echo 1; echo 2; echo 3");
        assert_eq!(output_lines(&app), ["2", "3"]);
    }
}
