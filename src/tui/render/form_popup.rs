use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, FormField, FormKind, FormState};
use crate::util::unicode::{byte_offset_to_display_col, truncate_to_width};

use super::centered_rect;

const POPUP_WIDTH: u16 = 52;
/// "▸ " marker plus the padded label
const LABEL_COLS: usize = 12;

/// Render the Add/Edit character popup
pub fn render_form_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(state) = &app.form else {
        return;
    };

    let bg = app.theme.popup_bg;
    let error_count = FormField::ORDER
        .iter()
        .filter(|f| state.error_for(**f).is_some())
        .count();
    // fields + errors + blank + hint, inside the border
    let height = (FormField::ORDER.len() + error_count + 2 + 2) as u16;
    let popup = centered_rect(POPUP_WIDTH, height, area);
    frame.render_widget(Clear, popup);

    let title = match state.kind {
        FormKind::Add => " Add Character ",
        FormKind::Edit { .. } => " Edit Character ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);

    let value_width = (inner.width as usize).saturating_sub(LABEL_COLS + 1);
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_at: Option<(u16, u16)> = None;

    for field in FormField::ORDER {
        let focused = state.focus == field;
        let marker = if focused { "\u{25B8} " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled(
                format!("{:<width$}", field.label(), width = LABEL_COLS - 2),
                label_style,
            ),
        ];
        spans.extend(value_spans(app, state, field, focused, value_width));

        if focused && !field.is_choice() {
            let col = byte_offset_to_display_col(state.value(field), state.cursor)
                .min(value_width.saturating_sub(1));
            cursor_at = Some((
                inner.x + (LABEL_COLS + col) as u16,
                inner.y + lines.len() as u16,
            ));
        }
        lines.push(Line::from(spans));

        if let Some(msg) = state.error_for(field) {
            lines.push(Line::from(Span::styled(
                format!(
                    "{}{}",
                    " ".repeat(LABEL_COLS),
                    truncate_to_width(&msg, value_width)
                ),
                Style::default().fg(app.theme.red).bg(bg),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        truncate_to_width(
            " Tab next  \u{2190}\u{2192} choose  Enter save  Esc cancel",
            inner.width as usize,
        ),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        popup,
    );

    if let Some(pos) = cursor_at
        && pos.1 < inner.y + inner.height
    {
        frame.set_cursor_position(pos);
    }
}

fn value_spans<'a>(
    app: &App,
    state: &FormState,
    field: FormField,
    focused: bool,
    width: usize,
) -> Vec<Span<'a>> {
    let bg = app.theme.popup_bg;
    let value = state.value(field);
    if field.is_choice() {
        let shown = if value.is_empty() { "(choose)" } else { value };
        let fg = if value.is_empty() {
            app.theme.dim
        } else {
            app.theme.text_bright
        };
        let arrow = Style::default().fg(app.theme.highlight).bg(bg);
        if focused {
            return vec![
                Span::styled("\u{25C2} ", arrow),
                Span::styled(
                    truncate_to_width(shown, width.saturating_sub(4)),
                    Style::default().fg(fg).bg(bg),
                ),
                Span::styled(" \u{25B8}", arrow),
            ];
        }
        return vec![Span::styled(
            truncate_to_width(shown, width),
            Style::default().fg(fg).bg(bg),
        )];
    }

    let style = if focused {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.background)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    let text = truncate_to_width(value, width);
    let pad = if focused {
        " ".repeat(width.saturating_sub(crate::util::unicode::display_width(&text)))
    } else {
        String::new()
    };
    vec![Span::styled(format!("{}{}", text, pad), style)]
}
