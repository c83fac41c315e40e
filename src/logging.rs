//! Mirror `tracing` log events into the console output.
//!
//! Install the layer through [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer):
//!
//! ```ignore
//! App::new()
//!     .add_plugins(DefaultPlugins.set(LogPlugin {
//!         custom_layer: bevy_dev_console::logging::custom_log_layer,
//!         ..default()
//!     }))
//!     .add_plugins(ConsolePlugin);
//! ```

use std::sync::mpsc;

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;

use crate::config::ConsoleConfig;
use crate::core::{ConsoleOutput, OutputLevel};

/// Creates the log capture layer for [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(build_log_layer(app)))
}

fn build_log_layer(app: &mut App) -> ConsoleLogLayer {
    let (sender, receiver) = mpsc::channel();
    app.add_message::<LogMessage>();
    app.insert_non_send_resource(LogReceiver(receiver));
    app.add_systems(PostUpdate, transfer_log_events);

    ConsoleLogLayer { sender }
}

/// A captured log event.
#[derive(Message, Debug, Clone)]
pub struct LogMessage {
    /// The message contents.
    pub message: String,
    /// The module or target that logged it.
    pub target: &'static str,
    /// The verbosity level.
    pub level: Level,
}

impl LogMessage {
    /// The console severity for this event.
    pub fn output_level(&self) -> OutputLevel {
        if self.level == Level::ERROR {
            OutputLevel::Error
        } else if self.level == Level::WARN {
            OutputLevel::Warning
        } else {
            OutputLevel::Info
        }
    }
}

/// Whether an event at `level` passes a `minimum` severity.
///
/// `tracing` orders levels by verbosity, so `ERROR` is the smallest.
pub fn passes_level(level: Level, minimum: Level) -> bool {
    level <= minimum
}

/// Moves captured events onto the main thread, into [`ConsoleOutput`] and
/// as [`LogMessage`]s.
fn transfer_log_events(
    receiver: NonSend<LogReceiver>,
    config: Option<Res<ConsoleConfig>>,
    mut output: Option<ResMut<ConsoleOutput>>,
    mut messages: MessageWriter<LogMessage>,
) {
    let minimum = config.map_or(Level::INFO, |config| config.captured_log_level);

    for captured in receiver.0.try_iter() {
        if passes_level(captured.level, minimum) {
            if let Some(output) = output.as_mut() {
                output.print(&captured.message, captured.output_level());
            }
        }
        messages.write(captured);
    }
}

/// Receiving end of the capture channel.
struct LogReceiver(mpsc::Receiver<LogMessage>);

/// A [`Layer`] that sends every log event with a message to the main thread.
struct ConsoleLogLayer {
    sender: mpsc::Sender<LogMessage>,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for ConsoleLogLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut message = None;
        event.record(&mut MessageVisitor(&mut message));
        if let Some(message) = message {
            let metadata = event.metadata();
            let _ = self.sender.send(LogMessage {
                message,
                target: metadata.target(),
                level: *metadata.level(),
            });
        }
    }
}

/// Records the `message` field of an event.
struct MessageVisitor<'a>(&'a mut Option<String>);

impl Visit for MessageVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}
