//! Main TUI application state and logic
//!
//! The app is the page hosting the form. Each key press is turned into at
//! most one [`FormEvent`], applied to the editor right away, and the page is
//! redrawn before the next key is read.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, error, info, warn};

use super::components::{FieldRow, TextInput, ROW_HEIGHT};
use super::focus::{self, Control, Focus};
use super::ui::{centered_rect, render_button, Styles};
use crate::config::Config;
use crate::editor::FieldListEditor;
use crate::errors::FormError;
use crate::events::FormEvent;
use crate::submit::{Submission, SubmitSink};

pub const FORM_TITLE: &str = "Customizable Form";

/// Main TUI application state
pub struct App {
    /// Application configuration
    pub config: Config,
    /// The form being edited
    pub editor: FieldListEditor,
    /// Focused control
    pub focus: Focus,
    /// Cursor of the focused text input
    pub input: TextInput,
    /// First field row shown on screen
    pub scroll_offset: usize,
    /// Successful submissions this session
    pub submissions: usize,
    sink: Box<dyn SubmitSink>,

    // Global application state
    pub should_quit: bool,
    pub show_help_popup: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    /// Create a new TUI application with a freshly initialized form
    pub fn new(config: Config) -> Result<Self> {
        let sink = config.submit_sink()?;
        Ok(Self::with_editor(config, FieldListEditor::initialize(), sink))
    }

    /// Create the application around an existing form and sink
    pub fn with_editor(config: Config, editor: FieldListEditor, sink: Box<dyn SubmitSink>) -> Self {
        let mut app = Self {
            config,
            focus: Focus::first(editor.fields()),
            editor,
            input: TextInput::default(),
            scroll_offset: 0,
            submissions: 0,
            sink,

            should_quit: false,
            show_help_popup: false,
            status_message: None,
            error_message: None,
        };
        app.reset_cursor();
        app
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        if self.error_message.is_none() {
            self.set_status(format!("Ready - submissions go to {}", self.sink.describe()));
        }

        loop {
            // Draw the UI
            terminal.draw(|f| self.draw(f))?;

            // Handle events
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global shortcuts
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Esc => {
                if self.show_help_popup {
                    self.show_help_popup = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        if self.show_help_popup {
            return;
        }

        match key.code {
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Char('n') if ctrl => self.add_field(),
            KeyCode::Char('d') if ctrl => self.delete_focused_row(),
            KeyCode::Tab => self.move_focus(focus::next(self.editor.fields(), self.focus)),
            KeyCode::BackTab => self.move_focus(focus::previous(self.editor.fields(), self.focus)),
            KeyCode::Up => self.move_focus(focus::row_up(self.editor.fields(), self.focus)),
            KeyCode::Down => self.move_focus(focus::row_down(self.editor.fields(), self.focus)),
            KeyCode::Enter => self.activate_focused(),
            KeyCode::Char(' ') if !self.focus_is_text_input() => self.activate_focused(),
            _ if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {}
            _ => self.edit_focused_text(key),
        }
    }

    /// Apply one event to the form and deliver the submission it produces
    pub fn dispatch(&mut self, event: FormEvent) {
        match self.try_dispatch(&event) {
            Ok(()) => {}
            Err(e) if event == FormEvent::SubmitClicked => {
                error!("Submission failed: {}", e);
                self.set_error(format!("Submission failed: {}", e));
            }
            Err(e) => {
                warn!("Form event {} rejected: {}", event, e);
                self.set_error(e.to_string());
            }
        }
    }

    /// Apply startup events in order through the session's sink.
    ///
    /// Stops at the first failing event; earlier events stay applied and
    /// their submissions are counted. Focus moves back to the first control.
    pub fn replay_startup(&mut self, ops: &[FormEvent]) -> Result<(), FormError> {
        let result = ops.iter().enumerate().try_for_each(|(offset, event)| {
            self.try_dispatch(event)
                .map_err(|source| FormError::at_event(offset + 1, event, source))
        });
        info!(
            events = ops.len(),
            delivered = self.submissions,
            fields = self.editor.len(),
            "Replayed startup events"
        );
        self.focus = Focus::first(self.editor.fields());
        self.reset_cursor();
        result
    }

    fn try_dispatch(&mut self, event: &FormEvent) -> Result<(), FormError> {
        debug!(%event, "Dispatching form event");
        match self.editor.apply(event)? {
            Some(submission) => self.deliver(&submission),
            None => {
                self.clear_messages();
                Ok(())
            }
        }
    }

    fn deliver(&mut self, submission: &Submission) -> Result<(), FormError> {
        self.sink.deliver(submission)?;
        self.submissions += 1;
        info!(fields = submission.len(), total = self.submissions, "Submission delivered");
        self.set_status(format!(
            "Submitted {} field(s) to {}",
            submission.len(),
            self.sink.describe()
        ));
        Ok(())
    }

    fn submit(&mut self) {
        self.dispatch(FormEvent::SubmitClicked);
    }

    fn add_field(&mut self) {
        self.dispatch(FormEvent::AddClicked);
        if let Some(field) = self.editor.fields().last() {
            self.focus = Focus::Row { id: field.id, control: Control::Label };
            self.reset_cursor();
        }
    }

    fn delete_focused_row(&mut self) {
        let Some((index, control)) = self.focused_position() else {
            return;
        };
        self.dispatch(FormEvent::DeleteClicked { index });
        self.focus = focus::after_delete(self.editor.fields(), index, control);
        self.reset_cursor();
    }

    fn activate_focused(&mut self) {
        match self.focus {
            Focus::Row { control: Control::Delete, .. } => self.delete_focused_row(),
            // Enter inside a text input submits the form
            Focus::Row { .. } | Focus::Submit => self.submit(),
            Focus::Add => self.add_field(),
        }
    }

    fn edit_focused_text(&mut self, key: KeyEvent) {
        let Some((index, control)) = self.focused_position() else {
            return;
        };
        let Some(text) = self.focused_text() else {
            return;
        };

        let edited = match key.code {
            KeyCode::Char(c) => Some(self.input.insert_char(&text, c)),
            KeyCode::Backspace => self.input.delete_char(&text),
            KeyCode::Delete => self.input.delete_char_forward(&text),
            KeyCode::Left => {
                self.input.move_cursor_left();
                None
            }
            KeyCode::Right => {
                self.input.move_cursor_right(&text);
                None
            }
            KeyCode::Home => {
                self.input.move_cursor_to_start();
                None
            }
            KeyCode::End => {
                self.input.move_cursor_to_end(&text);
                None
            }
            _ => None,
        };

        if let Some(edited) = edited {
            let event = match control {
                Control::Label => FormEvent::LabelEdited { index, label: edited },
                Control::Value => FormEvent::ValueEdited { index, value: edited },
                Control::Delete => return,
            };
            self.dispatch(event);
        }
    }

    fn move_focus(&mut self, target: Focus) {
        self.focus = target;
        self.reset_cursor();
    }

    /// Position of the focused row in the current list and the focused control
    pub fn focused_position(&self) -> Option<(usize, Control)> {
        let id = self.focus.row_id()?;
        let control = self.focus.control()?;
        self.editor.position(id).map(|index| (index, control))
    }

    fn focused_text(&self) -> Option<String> {
        let (index, control) = self.focused_position()?;
        let field = self.editor.get(index)?;
        match control {
            Control::Label => Some(field.label.clone()),
            Control::Value => Some(field.value.clone()),
            Control::Delete => None,
        }
    }

    fn focus_is_text_input(&self) -> bool {
        self.focus.control().map(|c| c.is_text_input()).unwrap_or(false)
    }

    fn reset_cursor(&mut self) {
        self.input = self
            .focused_text()
            .map(|text| TextInput::at_end(&text))
            .unwrap_or_default();
    }

    /// Set status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.error_message = None;
    }

    /// Set error message
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.status_message = None;
    }

    /// Clear status and error messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_title(f, chunks[0]);
        self.draw_fields(f, chunks[1]);
        self.draw_controls(f, chunks[2]);
        self.draw_status_bar(f, chunks[3]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_title(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new(FORM_TITLE)
            .alignment(Alignment::Center)
            .style(Styles::title())
            .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(title, area);
    }

    fn draw_fields(&mut self, f: &mut Frame, area: Rect) {
        if self.editor.is_empty() {
            let empty = Paragraph::new("No questions. Choose Add Question or press Ctrl+N.")
                .alignment(Alignment::Center)
                .style(Styles::inactive());
            f.render_widget(empty, area);
            return;
        }

        let visible_rows = ((area.height / ROW_HEIGHT) as usize).max(1);
        self.scroll_to_focus(visible_rows);

        let focused = self.focused_position();
        let fields = self.editor.snapshot();
        for (slot, (index, field)) in fields
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_rows)
            .enumerate()
        {
            let y = area.y + slot as u16 * ROW_HEIGHT;
            let height = ROW_HEIGHT.min(area.y + area.height - y);
            if height == 0 {
                break;
            }
            let row_area = Rect::new(area.x, y, area.width, height);
            let row = FieldRow {
                field,
                focused: focused
                    .filter(|(focused_index, _)| *focused_index == index)
                    .map(|(_, control)| (control, &self.input)),
            };
            row.render(f, row_area);
        }
    }

    /// Keep the focused row inside the visible window
    fn scroll_to_focus(&mut self, visible_rows: usize) {
        let max_offset = self.editor.len().saturating_sub(visible_rows);
        let target = match self.focus {
            Focus::Row { .. } => self.focused_position().map(|(index, _)| index),
            Focus::Submit | Focus::Add => self.editor.len().checked_sub(1),
        };

        if let Some(index) = target {
            if index < self.scroll_offset {
                self.scroll_offset = index;
            } else if index >= self.scroll_offset + visible_rows {
                self.scroll_offset = index + 1 - visible_rows;
            }
        }
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    fn draw_controls(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(12),
                Constraint::Length(2),
                Constraint::Length(18),
                Constraint::Min(0),
            ])
            .split(area);

        render_button(f, chunks[1], "Submit", Color::Blue, self.focus == Focus::Submit);
        render_button(f, chunks[3], "Add Question", Color::DarkGray, self.focus == Focus::Add);
    }

    /// Draw status bar with form info and shortcuts
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if let Some(ref msg) = self.status_message {
            format!("Status: {}", msg)
        } else if let Some(ref err) = self.error_message {
            format!("Error: {}", err)
        } else {
            format!(
                "{} question(s) | Ctrl+S: Submit | Ctrl+N: Add | Ctrl+D: Delete | Esc: Quit | F1: Help",
                self.editor.len()
            )
        };

        let style = if self.error_message.is_some() {
            Styles::error()
        } else if self.status_message.is_some() {
            Styles::success()
        } else {
            Styles::inactive()
        };

        let status_bar = Paragraph::new(status_text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(status_bar, area);
    }

    /// Draw help popup with shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(help_text())
            .block(
                Block::default()
                    .title("Help - Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }
}

fn help_text() -> &'static str {
    "Navigation:\n\
    Tab / Shift+Tab - Next / previous control\n\
    ↑/↓ - Same column in the row above / below\n\n\
    Editing:\n\
    Type, Backspace, Delete, ←/→, Home/End - Edit question or answer\n\
    Enter - Activate button (submits from a text input)\n\
    Ctrl+N - Add question\n\
    Ctrl+D - Delete focused question\n\
    Ctrl+S - Submit\n\n\
    Global:\n\
    F1 - Toggle this help\n\
    Esc - Close help / quit\n\
    Ctrl+C - Quit"
}
