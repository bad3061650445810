use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::CharacterClass;
use crate::ops::projection::{Bucket, CharacterRow, ListRow};
use crate::tui::app::App;
use crate::util::unicode::{display_width, split_line, truncate_to_width};

/// Screen lines a row takes up
pub fn row_height(row: &ListRow) -> usize {
    match row {
        // label, [note], user, pass
        ListRow::Character { row, .. } => 3 + usize::from(row.note.is_some()),
        _ => 1,
    }
}

/// Scroll just far enough that the whole cursor row fits in `height` lines
pub fn keep_cursor_visible(app: &mut App, height: usize) {
    if app.rows.is_empty() {
        app.cursor = 0;
        app.scroll_offset = 0;
        return;
    }
    app.clamp_cursor();
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
        return;
    }
    while app.scroll_offset < app.cursor {
        let used: usize = app.rows[app.scroll_offset..=app.cursor]
            .iter()
            .map(row_height)
            .sum();
        if used <= height {
            break;
        }
        app.scroll_offset += 1;
    }
}

/// Render the grouped character list
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let height = area.height as usize;
    keep_cursor_visible(app, height);

    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for (idx, row) in app.rows.iter().enumerate().skip(app.scroll_offset) {
        if lines.len() >= height {
            break;
        }
        let is_cursor = idx == app.cursor;
        match row {
            ListRow::SectionHeader(bucket) => {
                lines.push(section_header_line(app, *bucket, is_cursor, width));
            }
            ListRow::ClassHeader {
                class,
                count,
                expanded,
            } => {
                lines.push(class_header_line(app, *class, *count, *expanded, is_cursor, width));
            }
            ListRow::Character { bucket, row } => {
                lines.extend(character_lines(app, *bucket, row, is_cursor, width));
            }
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

fn section_header_line(app: &App, bucket: Bucket, is_cursor: bool, width: usize) -> Line<'static> {
    let (title, color) = match bucket {
        Bucket::Recent => ("Recent", app.theme.yellow),
        Bucket::Favorites => ("Favorites", app.theme.gold),
        Bucket::Class(class) => (class.label(), app.theme.text_bright),
    };
    let bg = row_bg(app, is_cursor, false);
    let style = Style::default()
        .fg(color)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    padded(vec![Span::styled(format!(" {}", title), style)], width, bg)
}

fn class_header_line(
    app: &App,
    class: CharacterClass,
    count: usize,
    expanded: bool,
    is_cursor: bool,
    width: usize,
) -> Line<'static> {
    let arrow = if expanded { "\u{25BC}" } else { "\u{25B6}" };
    let bg = row_bg(app, is_cursor, false);
    let style = if count == 0 {
        Style::default().fg(app.theme.dim).bg(bg)
    } else {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    };
    let text = truncate_to_width(&format!(" {} {} ({})", arrow, class.label(), count), width);
    padded(vec![Span::styled(text, style)], width, bg)
}

/// Label line with server and star on the right, an optional note, then
/// the two credential lines
fn character_lines(
    app: &App,
    bucket: Bucket,
    row: &CharacterRow,
    is_cursor: bool,
    width: usize,
) -> Vec<Line<'static>> {
    let bg = row_bg(app, is_cursor, row.is_selected);
    let base = Style::default().bg(bg);
    let mut name_style = base.fg(app.theme.text_bright);
    let mut cred_style = base.fg(app.theme.text);
    if row.is_selected {
        name_style = name_style.add_modifier(Modifier::BOLD);
        cred_style = cred_style
            .fg(app.theme.text_bright)
            .add_modifier(Modifier::BOLD);
    }

    let label = match bucket {
        Bucket::Class(_) => row.short_label(),
        Bucket::Recent | Bucket::Favorites => row.long_label(),
    };
    let (star, star_color) = if row.is_favorite {
        ("\u{2605}", app.theme.gold)
    } else {
        ("\u{2606}", app.theme.dim)
    };
    let right = format!("{} {}", row.server.label(), star);
    // two-cell indent, one cell of right margin
    let inner = width.saturating_sub(3);
    let text = split_line(&label, &right, inner);

    let mut first = vec![Span::styled("  ", base)];
    match text.strip_suffix(right.as_str()) {
        Some(left) => {
            first.push(Span::styled(left.to_string(), name_style));
            first.push(Span::styled(
                format!("{} ", row.server.label()),
                base.fg(app.theme.server_color(row.server))
                    .add_modifier(Modifier::BOLD),
            ));
            first.push(Span::styled(star, base.fg(star_color)));
        }
        None => first.push(Span::styled(text, name_style)),
    }

    let detail_width = width.saturating_sub(4);
    let mut lines = vec![padded(first, width, bg)];
    if let Some(note) = &row.note {
        let note_style = base
            .fg(if row.is_selected { app.theme.text } else { app.theme.dim })
            .add_modifier(Modifier::ITALIC);
        lines.push(padded(
            vec![
                Span::styled("    ", base),
                Span::styled(truncate_to_width(note, detail_width), note_style),
            ],
            width,
            bg,
        ));
    }
    for cred in [
        format!("User: {}", row.username),
        format!("Pass: {}", row.password),
    ] {
        lines.push(padded(
            vec![
                Span::styled("    ", base),
                Span::styled(truncate_to_width(&cred, detail_width), cred_style),
            ],
            width,
            bg,
        ));
    }
    lines
}

fn row_bg(app: &App, is_cursor: bool, is_selected: bool) -> Color {
    if is_cursor {
        app.theme.highlight
    } else if is_selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    }
}

/// Fill the rest of the line with `bg` so highlights span the full width
fn padded(mut spans: Vec<Span<'static>>, width: usize, bg: Color) -> Line<'static> {
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
    }
    Line::from(spans)
}
