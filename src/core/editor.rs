//! Single-line text editor with selection and submission history.
//!
//! Positions are counted in chars, not bytes.

/// Edit buffer, cursor, selection and history of the console prompt.
///
/// The selection is stored as a signed length relative to the cursor:
/// positive extends to the right of the cursor, negative to the left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    buffer: String,
    cursor: usize,
    selection: isize,
    history: Vec<String>,
    user_typed: bool,
}

impl LineEditor {
    /// Create an empty editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current text.
    #[inline]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position, in chars.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Signed selection length, in chars.
    #[inline]
    pub fn selection(&self) -> isize {
        self.selection
    }

    /// Selected range as `(start, end)` char positions.
    pub fn selection_range(&self) -> (usize, usize) {
        let anchor = self.cursor.saturating_add_signed(self.selection);
        (self.cursor.min(anchor), self.cursor.max(anchor))
    }

    /// The selected text.
    pub fn selected_text(&self) -> &str {
        let (start, end) = self.selection_range();
        &self.buffer[self.byte_at(start)..self.byte_at(end)]
    }

    /// Previously submitted lines, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Whether the buffer holds text the user changed since the last
    /// submission, clear or history recall.
    #[inline]
    pub fn user_typed(&self) -> bool {
        self.user_typed
    }

    /// Whether Up/Down should recall history instead of cycling suggestions.
    pub fn browsing_history(&self) -> bool {
        !self.user_typed && !self.history.is_empty()
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_at(&self, char_pos: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn changed(&mut self) {
        self.user_typed = !self.buffer.is_empty();
        self.cursor = self.cursor.min(self.len());
        self.selection = 0;
    }

    fn remove_selection(&mut self) -> bool {
        if self.selection == 0 {
            return false;
        }
        let (start, end) = self.selection_range();
        let range = self.byte_at(start)..self.byte_at(end);
        self.buffer.replace_range(range, "");
        self.cursor = start;
        self.selection = 0;
        true
    }

    /// Insert a char at the cursor, replacing the selection.
    pub fn insert_char(&mut self, c: char) {
        self.remove_selection();
        let at = self.byte_at(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        self.changed();
    }

    /// Insert text at the cursor, replacing the selection.
    pub fn insert_str(&mut self, text: &str) {
        self.remove_selection();
        let at = self.byte_at(self.cursor);
        self.buffer.insert_str(at, text);
        self.cursor += text.chars().count();
        self.changed();
    }

    /// Delete the selection or the char before the cursor.
    pub fn backspace(&mut self) {
        if self.remove_selection() {
            self.changed();
        } else if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_at(self.cursor);
            self.buffer.remove(at);
            self.changed();
        }
    }

    /// Delete the selection or the char after the cursor.
    pub fn delete(&mut self) {
        if self.remove_selection() {
            self.changed();
        } else if self.cursor < self.len() {
            let at = self.byte_at(self.cursor);
            self.buffer.remove(at);
            self.changed();
        }
    }

    /// Move the cursor one char left. With `extend`, grow the selection.
    pub fn move_left(&mut self, extend: bool) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.selection = if extend { self.selection + 1 } else { 0 };
    }

    /// Move the cursor one char right. With `extend`, grow the selection.
    pub fn move_right(&mut self, extend: bool) {
        if self.cursor >= self.len() {
            return;
        }
        self.cursor += 1;
        self.selection = if extend { self.selection - 1 } else { 0 };
    }

    /// Select the whole buffer, leaving the cursor at the end.
    pub fn select_all(&mut self) {
        self.cursor = self.len();
        self.selection = -(self.cursor as isize);
    }

    /// Replace the buffer, putting the cursor at the end.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.changed();
        self.cursor = self.len();
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.changed();
    }

    /// Take the buffer as a submitted line and record it in history.
    ///
    /// Blank lines are not submitted. A line already in history moves to the
    /// most recent position instead of being duplicated.
    pub fn submit(&mut self) -> Option<String> {
        if self.buffer.trim().is_empty() {
            self.clear();
            return None;
        }
        let line = std::mem::take(&mut self.buffer);
        self.push_history(line.clone());
        self.changed();
        Some(line)
    }

    /// Record a line in history, moving an existing copy to the end.
    pub fn push_history(&mut self, line: String) {
        self.history.retain(|entry| *entry != line);
        self.history.push(line);
    }

    /// Recall the previous history entry, wrapping to the newest.
    ///
    /// A buffer that is not in history recalls the newest entry.
    pub fn history_previous(&mut self) -> bool {
        let len = self.history.len();
        if len == 0 {
            return false;
        }
        let index = match self.history_position() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.recall(index);
        true
    }

    /// Recall the next history entry, wrapping to the oldest.
    pub fn history_next(&mut self) -> bool {
        let len = self.history.len();
        if len == 0 {
            return false;
        }
        let index = self.history_position().map_or(0, |i| (i + 1) % len);
        self.recall(index);
        true
    }

    fn history_position(&self) -> Option<usize> {
        self.history.iter().position(|entry| *entry == self.buffer)
    }

    fn recall(&mut self, index: usize) {
        let entry = self.history[index].clone();
        self.set_buffer(entry);
        self.user_typed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> LineEditor {
        let mut editor = LineEditor::new();
        for c in text.chars() {
            editor.insert_char(c);
        }
        editor
    }

    #[test]
    fn test_insert_and_cursor() {
        let mut editor = typed("tp");
        assert_eq!(editor.buffer(), "tp");
        assert_eq!(editor.cursor(), 2);
        assert!(editor.user_typed());

        editor.move_left(false);
        editor.insert_char('x');
        assert_eq!(editor.buffer(), "txp");
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut editor = typed("ab");
        editor.move_right(false);
        assert_eq!(editor.cursor(), 2);
        editor.move_left(false);
        editor.move_left(false);
        editor.move_left(false);
        assert_eq!(editor.cursor(), 0);
        editor.backspace();
        assert_eq!(editor.buffer(), "ab");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut editor = typed("abcd");
        editor.backspace();
        assert_eq!(editor.buffer(), "abc");

        editor.move_left(false);
        editor.move_left(false);
        editor.delete();
        assert_eq!(editor.buffer(), "ac");
        assert_eq!(editor.cursor(), 1);

        editor.move_right(false);
        editor.delete();
        assert_eq!(editor.buffer(), "ac");
    }

    #[test]
    fn test_unicode_positions() {
        let mut editor = typed("héllo");
        assert_eq!(editor.cursor(), 5);
        editor.move_left(false);
        editor.move_left(false);
        editor.move_left(false);
        editor.backspace();
        assert_eq!(editor.buffer(), "hllo");
        editor.insert_char('ö');
        assert_eq!(editor.buffer(), "höllo");
    }

    #[test]
    fn test_shift_selection() {
        let mut editor = typed("hello");
        editor.move_left(true);
        editor.move_left(true);
        assert_eq!(editor.selection(), 2);
        assert_eq!(editor.selection_range(), (3, 5));
        assert_eq!(editor.selected_text(), "lo");

        editor.move_right(true);
        assert_eq!(editor.selected_text(), "o");

        editor.move_left(false);
        assert_eq!(editor.selection(), 0);
    }

    #[test]
    fn test_selection_left_of_cursor() {
        let mut editor = typed("hello");
        editor.move_left(false);
        editor.move_left(false);
        editor.move_left(false);
        editor.move_right(true);
        editor.move_right(true);
        assert_eq!(editor.selection(), -2);
        assert_eq!(editor.selected_text(), "ll");

        editor.insert_char('L');
        assert_eq!(editor.buffer(), "heLo");
        assert_eq!(editor.cursor(), 3);
        assert_eq!(editor.selection(), 0);
    }

    #[test]
    fn test_backspace_removes_selection() {
        let mut editor = typed("hello");
        editor.move_left(true);
        editor.move_left(true);
        editor.backspace();
        assert_eq!(editor.buffer(), "hel");
        assert_eq!(editor.cursor(), 3);

        editor.select_all();
        editor.delete();
        assert_eq!(editor.buffer(), "");
        assert!(!editor.user_typed());
    }

    #[test]
    fn test_select_all_replace() {
        let mut editor = typed("old text");
        editor.select_all();
        assert_eq!(editor.selection(), -8);
        assert_eq!(editor.selected_text(), "old text");
        editor.insert_str("new");
        assert_eq!(editor.buffer(), "new");
        assert_eq!(editor.cursor(), 3);
    }

    #[test]
    fn test_submit_and_dedup_history() {
        let mut editor = typed("a");
        assert_eq!(editor.submit().as_deref(), Some("a"));
        editor.set_buffer("b");
        editor.submit();
        editor.set_buffer("a");
        editor.submit();
        editor.set_buffer("a");
        editor.submit();

        assert_eq!(editor.history(), ["b", "a"]);
        assert_eq!(editor.buffer(), "");
        assert!(!editor.user_typed());
    }

    #[test]
    fn test_blank_lines_not_submitted() {
        let mut editor = typed("   ");
        assert_eq!(editor.submit(), None);
        assert!(editor.history().is_empty());
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn test_history_wraps() {
        let mut editor = LineEditor::new();
        for line in ["one", "two", "three"] {
            editor.set_buffer(line);
            editor.submit();
        }

        assert!(editor.browsing_history());
        editor.history_previous();
        assert_eq!(editor.buffer(), "three");
        editor.history_previous();
        assert_eq!(editor.buffer(), "two");
        editor.history_previous();
        editor.history_previous();
        assert_eq!(editor.buffer(), "three");

        editor.history_next();
        assert_eq!(editor.buffer(), "one");
        assert_eq!(editor.cursor(), 3);
        assert!(editor.browsing_history());

        editor.clear();
        editor.history_next();
        assert_eq!(editor.buffer(), "one");
    }

    #[test]
    fn test_typing_stops_history_browsing() {
        let mut editor = LineEditor::new();
        assert!(!editor.history_previous());
        editor.set_buffer("x");
        editor.submit();

        editor.history_previous();
        assert!(editor.browsing_history());
        editor.insert_char('y');
        assert!(!editor.browsing_history());
        editor.clear();
        assert!(editor.browsing_history());
    }
}
