use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

use super::centered_rect;

/// Render the delete confirmation popup
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(confirm) = &app.confirm else {
        return;
    };
    let bg = app.theme.popup_bg;

    let prompt = format!(" Delete {} permanently? ", confirm.name);
    let keys = " y delete   n keep ";
    let width = (display_width(&prompt).max(display_width(keys)) + 2)
        .min(area.width as usize) as u16;
    let popup = centered_rect(width, 4, area);
    frame.render_widget(Clear, popup);

    let inner_width = (width as usize).saturating_sub(2);
    let lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&prompt, inner_width),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(keys, Style::default().fg(app.theme.dim).bg(bg))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::ConfirmState;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn confirm_names_the_character() {
        let (_tmp, mut app) = app_with(&[]);
        app.confirm = Some(ConfirmState {
            id: "C-001".into(),
            name: "Zeb".into(),
        });
        let output = render_to_string(40, 6, |frame, area| {
            render_confirm_popup(frame, &app, area);
        });
        assert!(output.contains("Delete Zeb permanently?"));
        assert!(output.contains("y delete"));
    }
}
