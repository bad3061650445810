pub mod confirm_popup;
pub mod filter_bar;
pub mod form_popup;
pub mod help_overlay;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Mode};

/// Narrowest the list column gets, however short the names are
const MIN_LIST_WIDTH: u16 = 36;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: filter bar (2 rows) | list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // filter tabs + separator
            Constraint::Min(1),    // list
            Constraint::Length(1), // status row
        ])
        .split(area);

    filter_bar::render_filter_bar(frame, app, chunks[0]);

    let list_width = (app.store.preferred_list_width() as u16)
        .max(MIN_LIST_WIDTH)
        .min(chunks[1].width);
    let list_area = Rect {
        width: list_width,
        ..chunks[1]
    };
    list_view::render_list_view(frame, app, list_area);

    // Overlays on top of everything
    match app.mode {
        Mode::Form => form_popup::render_form_popup(frame, app, area),
        Mode::Confirm => confirm_popup::render_confirm_popup(frame, app, area),
        Mode::Navigate => {}
    }
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Create a centered rectangle of fixed size, clipped to the parent
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
