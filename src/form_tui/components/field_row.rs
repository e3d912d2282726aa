//! One question row: label input, answer input and delete control

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    Frame,
};

use crate::form_tui::{
    components::text_input::{TextInput, TextInputView},
    focus::Control,
    ui::{render_button, Styles},
};
use crate::models::Field;

/// Height of a rendered row in terminal lines
pub const ROW_HEIGHT: u16 = 3;

pub const LABEL_PLACEHOLDER: &str = "Question";
pub const VALUE_PLACEHOLDER: &str = "Answer";

pub struct FieldRow<'a> {
    pub field: &'a Field,
    /// Focused control of this row and the cursor of the focused input
    pub focused: Option<(Control, &'a TextInput)>,
}

impl<'a> FieldRow<'a> {
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(50),
                Constraint::Percentage(15),
            ])
            .split(area);

        let cursor_for = |control: Control| match self.focused {
            Some((focused, input)) if focused == control => Some(input),
            _ => None,
        };

        let label_id = self.field.label_input_id();
        TextInputView {
            title: &label_id,
            text: &self.field.label,
            placeholder: LABEL_PLACEHOLDER,
            text_style: Styles::label_text(),
            focused: cursor_for(Control::Label),
        }
        .render(f, chunks[0]);

        let value_id = self.field.value_input_id();
        TextInputView {
            title: &value_id,
            text: &self.field.value,
            placeholder: VALUE_PLACEHOLDER,
            text_style: Styles::default(),
            focused: cursor_for(Control::Value),
        }
        .render(f, chunks[1]);

        let delete_focused = matches!(self.focused, Some((Control::Delete, _)));
        render_button(f, chunks[2], "Delete", Color::Red, delete_focused);
    }
}
