use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::ServerFilter;
use crate::ops::projection::ListRow;
use crate::ops::validate::CharacterForm;
use crate::tui::app::{App, ConfirmState, FormKind, FormState, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts everything except its own close keys
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    // Clear any transient status message on keypress
    app.status_message = None;
    app.status_is_error = false;

    match (key.modifiers, key.code) {
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
        }

        // Cursor movement
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => move_cursor(app, 1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => move_cursor(app, -1),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => {
            app.cursor = 0;
        }
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.cursor = app.rows.len().saturating_sub(1);
        }

        // Server filter
        (_, KeyCode::Char(c @ '1'..='4')) => {
            let idx = c as usize - '1' as usize;
            apply_filter(app, ServerFilter::ALL[idx]);
        }
        (_, KeyCode::Tab) => {
            let next = app.store.filter().next();
            apply_filter(app, next);
        }

        (_, KeyCode::Enter) | (_, KeyCode::Char(' ')) => activate_row(app),

        (_, KeyCode::Char('f')) => toggle_favorite(app),
        (_, KeyCode::Char('a')) => {
            app.form = Some(FormState::new(FormKind::Add, CharacterForm::default()));
            app.mode = Mode::Form;
        }
        (_, KeyCode::Char('e')) => open_edit(app),
        (_, KeyCode::Char('d')) => match app.target_character() {
            Some((id, name)) => {
                app.confirm = Some(ConfirmState { id, name });
                app.mode = Mode::Confirm;
            }
            None => app.set_error("select a character first"),
        },
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    if app.rows.is_empty() {
        return;
    }
    let last = app.rows.len() as isize - 1;
    app.cursor = (app.cursor as isize + delta).clamp(0, last) as usize;
}

/// Switch servers, keeping the class group at the top of the view in place
fn apply_filter(app: &mut App, filter: ServerFilter) {
    let anchor = app.current_anchor();
    match app.store.set_server_filter(filter, anchor) {
        Ok(anchor) => app.rebuild(anchor),
        Err(e) => {
            app.rebuild(anchor);
            app.report(&e);
        }
    }
}

/// Enter/Space: fold a class group or select a character
fn activate_row(app: &mut App) {
    let anchor = app.current_anchor();
    let result = match app.cursor_row() {
        Some(ListRow::ClassHeader { class, .. }) => {
            let class = *class;
            app.store.toggle_class_expansion(class).map(|_| ())
        }
        Some(ListRow::Character { row, .. }) => {
            let id = row.id.clone();
            app.store.select(&id)
        }
        Some(ListRow::SectionHeader(_)) | None => return,
    };
    app.rebuild(anchor);
    if let Err(e) = result {
        app.report(&e);
    }
}

fn toggle_favorite(app: &mut App) {
    let Some((id, name)) = app.target_character() else {
        app.set_error("select a character first");
        return;
    };
    let anchor = app.current_anchor();
    let result = app.store.toggle_favorite(&id);
    app.rebuild(anchor);
    match result {
        Ok(true) => app.set_status(format!("{} added to favorites", name)),
        Ok(false) => app.set_status(format!("{} removed from favorites", name)),
        Err(e) => app.report(&e),
    }
}

fn open_edit(app: &mut App) {
    let Some(character) = app
        .target_character()
        .and_then(|(id, _)| app.store.get(&id))
    else {
        app.set_error("select a character first");
        return;
    };
    let kind = FormKind::Edit {
        id: character.id.clone(),
    };
    app.form = Some(FormState::new(kind, CharacterForm::from_character(character)));
    app.mode = Mode::Form;
}
