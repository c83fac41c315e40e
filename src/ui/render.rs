//! Console layout over host-provided drawing primitives.
//!
//! The console does not own a renderer. A host implements [`ConsoleCanvas`]
//! for whatever it draws with (gizmos, UI nodes, an immediate-mode overlay)
//! and calls [`draw_console`] once per frame.
//!
//! Coordinates are in pixels with the origin at the top-left of the viewport
//! and Y pointing down. Text positions are the top-left corner of the text.

use bevy::prelude::*;

use crate::core::{ConsoleInput, ConsoleOutput, ConsoleState};

/// Distance between the panels and the viewport edges.
pub const MARGIN: f32 = 20.0;
/// Inner padding of the panels.
pub const PADDING: f32 = 5.0;
/// Height of one text line.
pub const LINE_HEIGHT: f32 = 32.0;
/// Gap between the output panel and the prompt.
pub const OUTPUT_BOTTOM_PADDING: f32 = 50.0;
/// Panel background.
pub const BACKGROUND_COLOR: Color = Color::srgba(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0, 220.0 / 255.0);

const PROMPT: &str = "> ";
const SELECTION_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);
const GHOST_COLOR: Color = Color::srgb(100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0);

/// 2D drawing primitives the console layout is expressed in.
pub trait ConsoleCanvas {
    /// Draw `text` with its top-left corner at `position`.
    fn draw_text(&mut self, text: &str, position: Vec2, color: Color);

    /// Fill a rectangle.
    fn draw_rect(&mut self, rect: Rect, color: Color);

    /// Draw a line segment.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);

    /// Size `text` would occupy when drawn.
    fn measure_text(&self, text: &str) -> Vec2;
}

/// Everything [`draw_console`] reads.
#[derive(Clone, Copy)]
pub struct ConsoleView<'a> {
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Output lines.
    pub output: &'a ConsoleOutput,
    /// Prompt contents.
    pub input: &'a ConsoleInput,
    /// Open state and blink timer.
    pub state: &'a ConsoleState,
    /// Cursor blink period in seconds.
    pub blink_period: f32,
}

/// Draw the console: output panel, prompt box, selection, suggestion and
/// cursor. Draws nothing while the console is closed.
pub fn draw_console(view: &ConsoleView, canvas: &mut impl ConsoleCanvas) {
    if !view.state.is_open() {
        return;
    }

    let editor = &view.input.editor;
    let buffer = editor.buffer();

    let command_y = view.viewport.y - MARGIN - LINE_HEIGHT - PADDING * 2.0;
    let width = view.viewport.x - MARGIN * 2.0;
    let text_x = MARGIN + PADDING * 2.0;
    let prefix_width = |chars: usize| -> f32 {
        let prefix: String = buffer.chars().take(chars).collect();
        canvas.measure_text(&format!("{PROMPT}{prefix}")).x
    };

    let prompt_rect = Rect::new(MARGIN, command_y, MARGIN + width, command_y + LINE_HEIGHT + PADDING * 2.0);
    let (selection_start, selection_end) = editor.selection_range();
    let selection = (editor.selection() != 0)
        .then(|| (prefix_width(selection_start), prefix_width(selection_end)));
    let cursor_x = text_x + prefix_width(editor.cursor());

    canvas.draw_rect(prompt_rect, BACKGROUND_COLOR);

    let text_top = command_y + PADDING;
    if let Some((start, end)) = selection {
        canvas.draw_rect(
            Rect::new(text_x + start, text_top, text_x + end, text_top + LINE_HEIGHT),
            SELECTION_COLOR,
        );
    }

    if editor.user_typed() {
        let suggestion = view.input.completion.current_suggestion();
        canvas.draw_text(&format!("{PROMPT}{suggestion}"), Vec2::new(text_x, text_top), GHOST_COLOR);
    }
    canvas.draw_text(&format!("{PROMPT}{buffer}"), Vec2::new(text_x, text_top), Color::WHITE);

    if view.state.cursor_visible(view.blink_period) {
        canvas.draw_line(
            Vec2::new(cursor_x, text_top),
            Vec2::new(cursor_x, text_top + LINE_HEIGHT),
            Color::WHITE,
        );
    }

    let visible = view.output.capacity();
    let output_height = LINE_HEIGHT * visible as f32 + PADDING * 2.0;
    let output_y = command_y - OUTPUT_BOTTOM_PADDING - output_height;
    canvas.draw_rect(
        Rect::new(MARGIN, output_y, MARGIN + width, output_y + output_height),
        BACKGROUND_COLOR,
    );

    if visible == 0 {
        return;
    }

    let inner_width = width - PADDING * 4.0;
    let mut row = 0;
    'lines: for line in view.output.iter() {
        let wrapped = wrap_text(&line.text, inner_width, |text| canvas.measure_text(text).x);
        for part in wrapped.iter().rev() {
            row += 1;
            let y = output_y + PADDING + LINE_HEIGHT * (visible - row) as f32;
            canvas.draw_text(part, Vec2::new(text_x, y), line.level.color());
            if row >= visible {
                break 'lines;
            }
        }
    }
}

/// Split `text` on spaces into lines no wider than `max_width`.
///
/// A single word wider than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}
