use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::ServerFilter;
use crate::tui::app::App;

/// Render the server filter tabs with a separator line below
pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = app.theme.background;
    let current = app.store.filter();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    for (i, filter) in ServerFilter::ALL.iter().enumerate() {
        let is_current = *filter == current;
        let mut style = Style::default()
            .fg(app.theme.filter_color(*filter))
            .bg(if is_current { app.theme.selection_bg } else { bg });
        if is_current {
            style = style.add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(format!(" {} {} ", i + 1, filter.label()), style));
        spans.push(sep.clone());
    }

    let count = app.store.document().accounts.len();
    let total = format!("{} characters ", count);
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let width = chunks[0].width as usize;
    if used + total.len() < width {
        spans.push(Span::styled(
            " ".repeat(width - used - total.len()),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(total, Style::default().fg(app.theme.dim).bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let rule = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(Span::styled(rule, Style::default().fg(app.theme.dim).bg(bg))),
        chunks[1],
    );
}
