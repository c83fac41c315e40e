//! Terminal backend for headless builds.
//!
//! Lines typed on stdin are executed like prompt submissions, and every line
//! printed to the console output is mirrored to stdout.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use bevy::prelude::*;

use crate::core::{ConsoleInputEvent, ConsoleOutput, OutputLevel};

/// Plugin that adds terminal (stdin/stdout) console support.
pub struct TerminalPlugin;

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        spawn_line_reader(sender);

        app.insert_resource(StdinLines(Mutex::new(receiver)))
            .init_resource::<TerminalConfig>()
            .add_systems(PreUpdate, read_stdin)
            .add_systems(Last, write_stdout);
    }
}

/// Configuration for terminal behavior.
#[derive(Resource, Debug, Clone, Default)]
pub struct TerminalConfig {
    /// Whether to color output by level with ANSI escape codes.
    pub colored: bool,
}

#[derive(Resource)]
struct StdinLines(Mutex<Receiver<String>>);

/// Forward non-empty stdin lines until stdin closes or the app drops the receiver.
fn spawn_line_reader(sender: Sender<String>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(Result::ok) {
            let text = line.trim();
            if !text.is_empty() && sender.send(text.to_string()).is_err() {
                break;
            }
        }
    });
}

fn read_stdin(receiver: Res<StdinLines>, mut events: MessageWriter<ConsoleInputEvent>) {
    let Ok(rx) = receiver.0.lock() else {
        return;
    };
    while let Ok(line) = rx.try_recv() {
        events.write(ConsoleInputEvent::new(line));
    }
}

fn write_stdout(output: Res<ConsoleOutput>, config: Res<TerminalConfig>, mut next_seq: Local<u64>) {
    let mut stdout = io::stdout().lock();
    for line in output.since(*next_seq) {
        let _ = writeln!(stdout, "{}", format_line(&line.text, line.level, config.colored));
    }
    let _ = stdout.flush();
    *next_seq = output.next_seq();
}

/// Format an output line for a terminal.
pub fn format_line(text: &str, level: OutputLevel, colored: bool) -> String {
    if !colored {
        return text.to_string();
    }

    let color = match level {
        OutputLevel::Info => "\x1b[0m",
        OutputLevel::Warning => "\x1b[33m",
        OutputLevel::Error => "\x1b[31m",
        OutputLevel::Echo => "\x1b[90m",
    };
    format!("{}{}\x1b[0m", color, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(format_line("hi", OutputLevel::Error, false), "hi");
        assert_eq!(format_line("hi", OutputLevel::Error, true), "\x1b[31mhi\x1b[0m");
        assert_eq!(format_line("> ls", OutputLevel::Echo, true), "\x1b[90m> ls\x1b[0m");
    }
}
