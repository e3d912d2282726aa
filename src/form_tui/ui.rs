//! Common UI styles and layout helpers for the questionnaire TUI

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default()
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_text() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Color::Green)
    }

    pub fn inactive() -> Style {
        Style::default()
            .fg(Color::Gray)
    }

    pub fn active_border() -> Style {
        Style::default()
            .fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default()
            .fg(Color::Gray)
    }

    pub fn button(color: Color, focused: bool) -> Style {
        let style = Style::default()
            .fg(Color::White)
            .bg(color)
            .add_modifier(Modifier::BOLD);
        if focused {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }
}

/// Render a bordered push button
pub fn render_button(f: &mut Frame, area: Rect, text: &str, color: Color, focused: bool) {
    let border_style = if focused {
        Styles::active_border()
    } else {
        Styles::inactive_border()
    };

    let button = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .style(Styles::button(color, focused))
        .block(Block::default().borders(Borders::ALL).border_style(border_style));

    f.render_widget(button, area);
}

/// Helper function to center a rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
