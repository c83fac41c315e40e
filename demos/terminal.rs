//! Terminal console example.
//!
//! Demonstrates the console with stdin/stdout for headless applications
//! like dedicated servers. Variables marked to save are written to the
//! working directory.
//!
//! Run with: `cargo run --example terminal --features terminal`
//!
//! Commands:
//! - `help` - List available commands
//! - `hostname` - Query the server name
//! - `hostname "My Server"` - Set it
//! - `status` - Show server status
//! - `quit` - Exit the application

use bevy::prelude::*;
use bevy_dev_console::{ConCommand, ConVar, Console, ConsoleOutput, ConsoleRegistry, TerminalConfig};

fn main() {
    println!("=== Terminal Console Example ===");
    println!("Type commands and press Enter. Type 'quit' to exit.");
    println!();

    // Ensure output is flushed before starting the app
    use std::io::Write;
    let _ = std::io::stdout().flush();

    App::new()
        .add_plugins((MinimalPlugins, bevy::input::InputPlugin))
        .add_plugins(bevy_dev_console::ConsolePlugin)
        .insert_resource(TerminalConfig { colored: true })
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut console: Console) {
    console.register_var(
        ConVar::new("hostname", "hostname <name> - server name", "Dedicated Server")
            .save_on_change(true),
    );

    console.register_var(
        ConVar::new("maxplayers", "maxplayers <1-64> - player limit", "32")
            .min(1)
            .max(64)
            .save_on_change(true),
    );

    console.register_cmd(
        ConCommand::new("status", |_args, world| {
            let registry = world.resource::<ConsoleRegistry>();
            let lines = [
                "=== Status ===".to_string(),
                format!("Hostname: {}", registry.var("hostname").map_or("", ConVar::as_str)),
                format!("Max Players: {}", registry.var("maxplayers").map_or(0, ConVar::as_int)),
            ];

            let mut output = world.resource_mut::<ConsoleOutput>();
            for line in lines {
                output.info(line);
            }
            true
        })
        .help("status - show server status"),
    );

    console.register_cmd(
        ConCommand::new("say", |args, world| {
            let mut output = world.resource_mut::<ConsoleOutput>();
            if args.is_empty() {
                output.warn("Usage: say <message>");
                return false;
            }
            output.info(format!("[SERVER] {}", args.join(" ")));
            true
        })
        .help("say <message> - broadcast a message"),
    );

    console.register_cmd(
        ConCommand::new("quit", |_args, world| {
            world.write_message(AppExit::Success);
            true
        })
        .help("quit - exit the application"),
    );
}
