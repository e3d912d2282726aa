//! Single-line text input
//!
//! The input does not own its text: the editor does. It only tracks the
//! cursor and turns keystrokes into the edited text, which the caller then
//! feeds back to the editor as an event.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::form_tui::ui::Styles;

/// Cursor state of the focused text input, counted in chars
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub cursor: usize,
}

impl TextInput {
    /// Cursor placed after the last char of `text`
    pub fn at_end(text: &str) -> Self {
        Self { cursor: text.chars().count() }
    }

    fn byte_offset(text: &str, cursor: usize) -> usize {
        text.char_indices()
            .nth(cursor)
            .map(|(offset, _)| offset)
            .unwrap_or(text.len())
    }

    fn clamp(&mut self, text: &str) {
        self.cursor = self.cursor.min(text.chars().count());
    }

    pub fn insert_char(&mut self, text: &str, c: char) -> String {
        self.clamp(text);
        let mut edited = text.to_string();
        edited.insert(Self::byte_offset(text, self.cursor), c);
        self.cursor += 1;
        edited
    }

    /// Remove the char before the cursor; `None` when there is nothing to remove
    pub fn delete_char(&mut self, text: &str) -> Option<String> {
        self.clamp(text);
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let mut edited = text.to_string();
        edited.remove(Self::byte_offset(text, self.cursor));
        Some(edited)
    }

    /// Remove the char under the cursor; `None` at the end of the text
    pub fn delete_char_forward(&mut self, text: &str) -> Option<String> {
        self.clamp(text);
        if self.cursor >= text.chars().count() {
            return None;
        }
        let mut edited = text.to_string();
        edited.remove(Self::byte_offset(text, self.cursor));
        Some(edited)
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self, text: &str) {
        if self.cursor < text.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_to_end(&mut self, text: &str) {
        self.cursor = text.chars().count();
    }

    /// Display columns taken by the text before the cursor
    pub fn cursor_column(&self, text: &str) -> usize {
        let prefix = &text[..Self::byte_offset(text, self.cursor)];
        prefix.width()
    }
}

/// How one text input is drawn
pub struct TextInputView<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub placeholder: &'a str,
    pub text_style: Style,
    /// Cursor state when this input has focus
    pub focused: Option<&'a TextInput>,
}

impl<'a> TextInputView<'a> {
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let showing_placeholder = self.text.is_empty();
        let display_text = if showing_placeholder {
            self.placeholder
        } else {
            self.text
        };

        let border_style = if self.focused.is_some() {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let block = Block::default()
            .title(self.title.to_string())
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if showing_placeholder {
            Styles::inactive()
        } else {
            self.text_style
        };

        let inner_width = area.width.saturating_sub(2) as usize;
        let cursor_column = self
            .focused
            .map(|input| input.cursor_column(self.text))
            .unwrap_or(0);
        let scroll = if inner_width > 0 && cursor_column >= inner_width {
            cursor_column + 1 - inner_width
        } else {
            0
        };

        let paragraph = Paragraph::new(display_text.to_string())
            .style(text_style)
            .block(block)
            .scroll((0, scroll as u16));

        f.render_widget(paragraph, area);

        if self.focused.is_some() && inner_width > 0 {
            let cursor_x = area.x + 1 + (cursor_column - scroll) as u16;
            let cursor_y = area.y + 1;
            f.set_cursor(cursor_x, cursor_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_cursor() {
        let mut input = TextInput::at_end("Name");
        let text = input.insert_char("Name", '?');
        assert_eq!(text, "Name?");
        assert_eq!(input.cursor, 5);

        input.move_cursor_to_start();
        let text = input.insert_char(&text, 'A');
        assert_eq!(text, "AName?");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = TextInput::at_end("abc");
        assert_eq!(input.delete_char("abc").as_deref(), Some("ab"));
        assert_eq!(input.delete_char_forward("ab"), None);

        input.move_cursor_to_start();
        assert_eq!(input.delete_char("ab"), None);
        assert_eq!(input.delete_char_forward("ab").as_deref(), Some("b"));
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_multibyte_text() {
        let mut input = TextInput::at_end("Café");
        assert_eq!(input.cursor, 4);
        input.move_cursor_left();
        assert_eq!(input.delete_char("Café").as_deref(), Some("Caé"));

        let mut input = TextInput::at_end("名前");
        assert_eq!(input.cursor_column("名前"), 4);
        input.move_cursor_left();
        assert_eq!(input.insert_char("名前", 'x'), "名x前");
    }

    #[test]
    fn test_cursor_is_clamped_to_text() {
        let mut input = TextInput { cursor: 10 };
        assert_eq!(input.insert_char("ab", 'c'), "abc");
        assert_eq!(input.cursor, 3);

        input.move_cursor_right("abc");
        assert_eq!(input.cursor, 3);
        input.move_cursor_to_end("abcdef");
        assert_eq!(input.cursor, 6);
    }
}
