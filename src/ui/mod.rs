//! Keyboard handling and drawing for the console prompt.
//!
//! Physical keys are turned into [`EditAction`]s by [`capture_keyboard`], and
//! applied to the [`ConsoleInput`] prompt by the exclusive console system.
//! Hosts can queue actions themselves through [`ConsoleEdits`].

use bevy::input::ButtonState;
use bevy::input::keyboard::KeyboardInput;
use bevy::prelude::*;

use crate::config::ConsoleConfig;
use crate::core::{
    BindInput, ConsoleInput, ConsoleRegistry, ConsoleState, ConsoleToggleEvent, KeyBindings, parse,
};

mod render;

pub use render::{
    BACKGROUND_COLOR, ConsoleCanvas, ConsoleView, LINE_HEIGHT, MARGIN, OUTPUT_BOTTOM_PADDING,
    PADDING, draw_console, wrap_text,
};

/// One editing operation on the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Type a character, replacing the selection.
    Insert(char),
    /// Delete the selection or the char before the cursor.
    Backspace,
    /// Delete the selection or the char after the cursor.
    Delete,
    /// Move the cursor left; `true` extends the selection.
    Left(bool),
    /// Move the cursor right; `true` extends the selection.
    Right(bool),
    /// Previous history entry, or previous suggestion while typing.
    Up,
    /// Next history entry, or next suggestion while typing.
    Down,
    /// Accept the current suggestion.
    Complete,
    /// Select the whole line.
    SelectAll,
    /// Empty the line.
    Clear,
    /// Run the line.
    Submit,
}

/// Edit actions waiting to be applied this frame.
#[derive(Resource, Debug, Default)]
pub struct ConsoleEdits(pub Vec<EditAction>);

impl ConsoleEdits {
    /// Queue an action.
    pub fn push(&mut self, action: EditAction) {
        self.0.push(action);
    }

    /// Queue one [`EditAction::Insert`] per char of `text`.
    pub fn type_text(&mut self, text: &str) {
        self.0.extend(text.chars().map(EditAction::Insert));
    }
}

/// Open or close the console when the toggle key is pressed.
pub(crate) fn toggle_console(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<ConsoleConfig>,
    mut state: ResMut<ConsoleState>,
    mut toggles: MessageWriter<ConsoleToggleEvent>,
) {
    if keys.just_pressed(config.toggle_key) {
        let open = state.toggle();
        debug!("Console {}", if open { "opened" } else { "closed" });
        toggles.write(ConsoleToggleEvent { open });
    }
}

/// Translate keyboard messages into [`EditAction`]s while the console is open.
pub(crate) fn capture_keyboard(
    state: Res<ConsoleState>,
    config: Res<ConsoleConfig>,
    keys: Res<ButtonInput<KeyCode>>,
    mut keyboard: MessageReader<KeyboardInput>,
    mut edits: ResMut<ConsoleEdits>,
) {
    if !state.is_open() {
        keyboard.clear();
        return;
    }

    let shift = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let ctrl = keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);

    for event in keyboard.read() {
        if event.state != ButtonState::Pressed || event.key_code == config.toggle_key {
            continue;
        }

        let action = match event.key_code {
            KeyCode::Escape if !event.repeat => EditAction::Clear,
            KeyCode::Enter | KeyCode::NumpadEnter if !event.repeat => EditAction::Submit,
            KeyCode::Tab if !event.repeat => EditAction::Complete,
            KeyCode::KeyA if ctrl && !event.repeat => EditAction::SelectAll,
            KeyCode::Backspace => EditAction::Backspace,
            KeyCode::Delete => EditAction::Delete,
            KeyCode::ArrowLeft => EditAction::Left(shift),
            KeyCode::ArrowRight => EditAction::Right(shift),
            KeyCode::ArrowUp => EditAction::Up,
            KeyCode::ArrowDown => EditAction::Down,
            KeyCode::Escape | KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Tab => continue,
            _ if ctrl => continue,
            _ => {
                if let Some(text) = &event.text {
                    edits
                        .0
                        .extend(text.chars().filter(|c| config.accepts(*c)).map(EditAction::Insert));
                }
                continue;
            }
        };
        edits.push(action);
    }
}

/// Collect the command lines of bindings pressed this frame.
///
/// Bindings are ignored while the console is open.
pub(crate) fn trigger_bindings(
    state: Res<ConsoleState>,
    keys: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    bindings: Res<KeyBindings>,
) -> Vec<String> {
    if state.is_open() {
        return Vec::new();
    }

    bindings.triggered(|input| match input {
        BindInput::Key(code) => keys.just_pressed(code),
        BindInput::Gamepad(button) => gamepads.iter().any(|pad| pad.just_pressed(button)),
    })
}

/// Advance the cursor blink timer while the console is open.
pub(crate) fn tick_cursor(time: Res<Time>, mut state: ResMut<ConsoleState>) {
    if state.is_open() {
        state.tick(time.delta_secs());
    }
}

/// Apply queued edits to the prompt.
///
/// Returns the submitted lines, in order. Completion is refreshed after every
/// edit that changes the line.
pub(crate) fn apply_edits(world: &mut World, edits: Vec<EditAction>) -> Vec<String> {
    let mut submitted = Vec::new();
    if edits.is_empty() {
        return submitted;
    }

    let cursor_moved = world.resource_scope(|world, mut input: Mut<ConsoleInput>| {
        let cursor = input.editor.cursor();

        for action in edits {
            let before = input.editor.buffer().to_string();
            if let Some(line) = apply_edit(&mut input, action) {
                submitted.push(line);
            }
            if input.editor.buffer() != before {
                refresh_completion(&mut input, world);
            }
        }

        input.editor.cursor() != cursor
    });

    if cursor_moved {
        world.resource_mut::<ConsoleState>().reset_blink();
    }
    submitted
}

fn apply_edit(input: &mut ConsoleInput, action: EditAction) -> Option<String> {
    let ConsoleInput { editor, completion } = input;

    match action {
        EditAction::Insert(c) => editor.insert_char(c),
        EditAction::Backspace => editor.backspace(),
        EditAction::Delete => editor.delete(),
        EditAction::Left(extend) => editor.move_left(extend),
        EditAction::Right(extend) => editor.move_right(extend),
        EditAction::Up => {
            if editor.browsing_history() {
                editor.history_previous();
            } else {
                completion.previous();
            }
        }
        EditAction::Down => {
            if editor.browsing_history() {
                editor.history_next();
            } else {
                completion.next();
            }
        }
        EditAction::Complete => editor.set_buffer(completion.current_suggestion()),
        EditAction::SelectAll => editor.select_all(),
        EditAction::Clear => editor.clear(),
        EditAction::Submit => return editor.submit(),
    }
    None
}

fn refresh_completion(input: &mut ConsoleInput, world: &World) {
    let sequence = parse(input.editor.buffer());
    if let Some(registry) = world.get_resource::<ConsoleRegistry>() {
        input.completion.refresh(&sequence, registry, world);
    }
}
