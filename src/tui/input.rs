//! Input field handling for the terminal user interface.

use ratatui::text::Span;

/// A single-line text input with a cursor measured in characters.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text value, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    /// Terminal columns taken by the text before the cursor.
    pub fn cursor_width(&self) -> u16 {
        let before = &self.value[..self.byte_index(self.cursor)];
        Span::raw(before).width().min(u16::MAX as usize) as u16
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_editing() {
        let mut field = InputField::new();
        for c in "wrk".chars() {
            field.handle_char(c);
        }
        field.move_cursor_left();
        field.move_cursor_left();
        field.handle_char('o');
        assert_eq!(field.value, "work");
        assert_eq!(field.cursor, 2);

        field.handle_backspace();
        assert_eq!(field.value, "wrk");
        field.handle_delete();
        assert_eq!(field.value, "wk");
        assert_eq!(field.cursor, 1);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut field = InputField::with_value("café");
        assert_eq!(field.cursor, 4);
        field.handle_backspace();
        assert_eq!(field.value, "caf");
        field.handle_char('é');
        field.move_home();
        field.handle_char('¡');
        assert_eq!(field.value, "¡café");
        field.move_end();
        field.move_cursor_right();
        assert_eq!(field.cursor, 5);
    }

    #[test]
    fn test_edges_are_no_ops() {
        let mut field = InputField::new();
        field.handle_backspace();
        field.handle_delete();
        field.move_cursor_left();
        field.move_cursor_right();
        assert_eq!(field.value, "");
        assert_eq!(field.cursor, 0);

        let mut field = InputField::with_value("abc");
        field.clear();
        assert_eq!((field.value.as_str(), field.cursor), ("", 0));
    }

    #[test]
    fn test_cursor_width_counts_columns() {
        let mut field = InputField::with_value("日本語 ok");
        assert_eq!(field.cursor_width(), 9);
        field.move_home();
        field.move_cursor_right();
        assert_eq!(field.cursor_width(), 2);
    }
}
