use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::truncate_to_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = if let Some(msg) = &app.status_message {
        let fg = if app.status_is_error {
            app.theme.red
        } else {
            app.theme.text_bright
        };
        Line::from(Span::styled(
            format!(" {}", truncate_to_width(msg, width.saturating_sub(1))),
            Style::default().fg(fg).bg(bg),
        ))
    } else if app.show_key_hints {
        let hints = match app.mode {
            Mode::Navigate => "a add  e edit  d delete  f fav  1-4 server  ? help  q quit",
            Mode::Form => "Tab next field  Enter save  Esc cancel",
            Mode::Confirm => "y delete  n keep",
        };
        Line::from(Span::styled(
            format!(" {}", truncate_to_width(hints, width.saturating_sub(1))),
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        Line::from(Span::styled(" ".repeat(width), Style::default().bg(bg)))
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
