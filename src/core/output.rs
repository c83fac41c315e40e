//! Console output buffer.

use std::collections::VecDeque;

use bevy::prelude::*;

/// Default number of lines kept in the output buffer.
pub const DEFAULT_OUTPUT_CAPACITY: usize = 24;

/// Severity of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputLevel {
    /// General information (white).
    #[default]
    Info,
    /// Warning (yellow).
    Warning,
    /// Error (red).
    Error,
    /// Echo of a submitted command line (gray).
    Echo,
}

impl OutputLevel {
    /// The color this level is drawn with.
    pub fn color(self) -> Color {
        match self {
            OutputLevel::Info => Color::WHITE,
            OutputLevel::Warning => Color::srgb(1.0, 1.0, 0.0),
            OutputLevel::Error => Color::srgb(1.0, 0.0, 0.0),
            OutputLevel::Echo => Color::srgb(0.6, 0.6, 0.6),
        }
    }
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLine {
    /// The text, without newlines.
    pub text: String,
    /// The severity.
    pub level: OutputLevel,
    /// Monotonic sequence number, unique per buffer.
    pub seq: u64,
}

/// Bounded buffer of printed lines. The newest line is at the front.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::{ConsoleOutput, OutputLevel};
///
/// let mut output = ConsoleOutput::new(2);
/// output.info("one");
/// output.print("two\nthree", OutputLevel::Warning);
///
/// let texts: Vec<_> = output.iter().map(|l| l.text.as_str()).collect();
/// assert_eq!(texts, ["three", "two"]);
/// ```
#[derive(Resource, Debug, Clone)]
pub struct ConsoleOutput {
    lines: VecDeque<OutputLine>,
    capacity: usize,
    next_seq: u64,
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_CAPACITY)
    }
}

impl ConsoleOutput {
    /// Create an empty buffer holding at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    /// Print text, one buffer line per `\n`-separated part.
    pub fn print(&mut self, text: impl AsRef<str>, level: OutputLevel) {
        for part in text.as_ref().split('\n') {
            self.lines.push_front(OutputLine {
                text: part.trim_end_matches('\r').to_string(),
                level,
                seq: self.next_seq,
            });
            self.next_seq += 1;
        }
        self.lines.truncate(self.capacity);
    }

    /// Print at [`OutputLevel::Info`].
    pub fn info(&mut self, text: impl AsRef<str>) {
        self.print(text, OutputLevel::Info);
    }

    /// Print at [`OutputLevel::Warning`].
    pub fn warn(&mut self, text: impl AsRef<str>) {
        self.print(text, OutputLevel::Warning);
    }

    /// Print at [`OutputLevel::Error`].
    pub fn error(&mut self, text: impl AsRef<str>) {
        self.print(text, OutputLevel::Error);
    }

    /// Print at [`OutputLevel::Echo`].
    pub fn echo(&mut self, text: impl AsRef<str>) {
        self.print(text, OutputLevel::Echo);
    }

    /// Remove every line. Sequence numbers keep counting.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines from newest to oldest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OutputLine> {
        self.lines.iter()
    }

    /// Lines with a sequence number of at least `seq`, oldest first.
    pub fn since(&self, seq: u64) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter().rev().filter(move |line| line.seq >= seq)
    }

    /// The sequence number the next printed line will get.
    #[inline]
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// The newest line, if any.
    pub fn latest(&self) -> Option<&OutputLine> {
        self.lines.front()
    }

    /// Maximum number of lines kept.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, dropping the oldest lines if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.lines.truncate(capacity);
    }

    /// Number of lines currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
