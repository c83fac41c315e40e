//! Minimal headless console example.
//!
//! Demonstrates driving the console programmatically without drawing it,
//! including a spatial command using `~` relative coordinates.
//!
//! Run with: `cargo run --example minimal`

use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy_dev_console::prelude::*;

#[derive(Resource, Default)]
struct Player {
    position: Vec3,
}

fn main() {
    App::new()
        .add_plugins((MinimalPlugins, InputPlugin))
        .insert_resource(ConsoleConfig::in_memory())
        .add_plugins(bevy_dev_console::ConsolePlugin)
        .insert_resource(Player {
            position: Vec3::new(0.0, 3.2, 0.0),
        })
        .add_systems(Startup, setup)
        .add_systems(Update, send_test_commands.run_if(run_once))
        .add_systems(Last, (print_output, exit_after_frames).chain())
        .run();
}

fn setup(mut console: Console) {
    console.register_var(
        ConVar::new("gravity", "gravity <value> - world gravity", "800")
            .min(0)
            .max(2000),
    );

    console.register_cmd(
        ConCommand::new("greet", |args, world| {
            let name = args.get_or(0, "World");
            world
                .resource_mut::<ConsoleOutput>()
                .info(format!("Hello, {}!", name));
            true
        })
        .help("greet [name] - say hello"),
    );

    console.register_cmd(
        ConCommand::new("tp", |args, world| {
            let current = world.resource::<Player>().position;
            match parse_relative_vec3(args.as_slice(), current) {
                Ok(position) => {
                    world.resource_mut::<Player>().position = position;
                    world
                        .resource_mut::<ConsoleOutput>()
                        .info(format!("Teleported to {}", position));
                    true
                }
                Err(message) => {
                    world.resource_mut::<ConsoleOutput>().warn(message);
                    false
                }
            }
        })
        .help("tp <x> <y> <z> - teleport, ~ is relative to the current position")
        .autocomplete(|args, world| {
            let current = world.get_resource::<Player>()?.position;
            bevy_dev_console::core::complete_coordinate(args, current)
        }),
    );
}

/// Send some test commands programmatically.
fn send_test_commands(mut events: MessageWriter<ConsoleInputEvent>) {
    // Query a variable, then set it out of range
    events.write(ConsoleInputEvent::new("gravity"));
    events.write(ConsoleInputEvent::new("gravity 5000; gravity"));

    // Commands, quoted arguments and relative coordinates
    events.write(ConsoleInputEvent::new("greet \"Dev Team\""));
    events.write(ConsoleInputEvent::new("tp 5 ~ 10; tp ~1 ~ oops"));

    events.write(ConsoleInputEvent::new("help"));
}

/// Print output lines as they appear.
fn print_output(output: Res<ConsoleOutput>, mut next_seq: Local<u64>) {
    for line in output.since(*next_seq) {
        let prefix = match line.level {
            OutputLevel::Info => "[INFO]",
            OutputLevel::Warning => "[WARN]",
            OutputLevel::Error => "[ERROR]",
            OutputLevel::Echo => "[>]",
        };
        println!("{} {}", prefix, line.text);
    }
    *next_seq = output.next_seq();
}

fn exit_after_frames(mut frames: Local<u32>, mut exit: MessageWriter<AppExit>) {
    *frames += 1;
    if *frames >= 3 {
        exit.write(AppExit::Success);
    }
}
