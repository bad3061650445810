use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::projection::Bucket;
use crate::ops::roster_ops::RosterError;
use crate::tui::app::{App, FormKind, FormState, Mode};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter) {
        submit(app);
        return;
    }
    if matches!(key.code, KeyCode::Esc) {
        close(app);
        return;
    }
    let Some(state) = app.form.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };
    edit_form(state, key);
}

fn close(app: &mut App) {
    app.form = None;
    app.mode = Mode::Navigate;
}

/// Field movement and text editing inside the popup
fn edit_form(state: &mut FormState, key: KeyEvent) {
    let field = state.focus;
    match (key.modifiers, key.code) {
        (_, KeyCode::Tab) | (_, KeyCode::Down) => state.move_focus(1),
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => state.move_focus(-1),

        (_, KeyCode::Left) if field.is_choice() => state.cycle_choice(-1),
        (_, KeyCode::Right) if field.is_choice() => state.cycle_choice(1),
        (_, KeyCode::Char(' ')) if field.is_choice() => state.cycle_choice(1),
        _ if field.is_choice() => {}

        (_, KeyCode::Left) => {
            if let Some(pos) = prev_grapheme_boundary(state.value(field), state.cursor) {
                state.cursor = pos;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(pos) = next_grapheme_boundary(state.value(field), state.cursor) {
                state.cursor = pos;
            }
        }
        (_, KeyCode::Home) => state.cursor = 0,
        (_, KeyCode::End) => state.cursor = state.value(field).len(),
        (_, KeyCode::Backspace) => {
            if let Some(pos) = prev_grapheme_boundary(state.value(field), state.cursor) {
                let end = state.cursor;
                state.value_mut(field).replace_range(pos..end, "");
                state.cursor = pos;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(end) = next_grapheme_boundary(state.value(field), state.cursor) {
                let start = state.cursor;
                state.value_mut(field).replace_range(start..end, "");
            }
        }
        (KeyModifiers::NONE, KeyCode::Char(c)) | (KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            let at = state.cursor;
            state.value_mut(field).insert(at, c);
            state.cursor = at + c.len_utf8();
        }
        _ => {}
    }
}

/// Enter: validate and save. Bad input keeps the popup open with the
/// problems listed under their fields.
fn submit(app: &mut App) {
    let Some(state) = app.form.as_ref() else {
        app.mode = Mode::Navigate;
        return;
    };
    let kind = state.kind.clone();
    let form = state.form.clone();
    let anchor = app.current_anchor();

    let result = match &kind {
        FormKind::Add => app.store.add(&form),
        FormKind::Edit { id } => app.store.edit(id, &form, anchor).map(|_| id.clone()),
    };

    match result {
        Ok(id) => {
            close(app);
            app.rebuild(anchor);
            if let Some(character) = app.store.get(&id) {
                let (class, name) = (character.class, character.name.clone());
                app.focus_row(Bucket::Class(class), &id);
                let verb = match kind {
                    FormKind::Add => "added",
                    FormKind::Edit { .. } => "updated",
                };
                app.set_status(format!("{} {}", verb, name));
            }
        }
        Err(RosterError::Validation(errors)) => {
            let count = errors.errors.len();
            if let Some(state) = app.form.as_mut() {
                state.errors = Some(errors);
            }
            app.set_error(if count == 1 {
                "1 field needs fixing".to_string()
            } else {
                format!("{} fields need fixing", count)
            });
        }
        Err(e) => {
            close(app);
            app.rebuild(anchor);
            app.report(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::model::{CharacterClass, Server};
    use crate::ops::validate::Field;
    use crate::tui::app::{FormField, Mode};
    use crate::tui::input::test_keys::{press, type_str};
    use crate::tui::render::test_helpers::app_with;

    fn open_add(app: &mut crate::tui::app::App) {
        press(app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Form);
    }

    #[test]
    fn typing_and_cursor_editing() {
        let (_tmp, mut app) = app_with(&[]);
        open_add(&mut app);
        type_str(&mut app, "Zbé");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        type_str(&mut app, "e");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.form.as_ref().unwrap().form.name, "Zeb");

        press(&mut app, KeyCode::Home);
        type_str(&mut app, "x");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.as_ref().unwrap().form.name, "Ze");
        assert_eq!(app.form.as_ref().unwrap().cursor, 2);
    }

    #[test]
    fn add_flow_saves_and_focuses_new_row() {
        let (_tmp, mut app) = app_with(&[]);
        open_add(&mut app);
        type_str(&mut app, "Zeb");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "50");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "zeb_acct");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "hunter2");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "bank alt");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.as_ref().unwrap().focus, FormField::Server);
        press(&mut app, KeyCode::Right); // Blue
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Left); // Wizard
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.form.is_none());
        assert_eq!(app.status_message.as_deref(), Some("added Zeb"));
        let row = app.cursor_character().unwrap();
        assert_eq!(row.name, "Zeb");
        assert_eq!(row.class, CharacterClass::Wizard);
        assert_eq!(row.server, Server::Blue);
        assert_eq!(row.note.as_deref(), Some("bank alt"));

        let on_disk = crate::io::roster_io::read_document(app.store.path()).unwrap();
        assert_eq!(on_disk.accounts.len(), 1);
    }

    #[test]
    fn invalid_submit_keeps_form_open() {
        let (_tmp, mut app) = app_with(&[]);
        open_add(&mut app);
        type_str(&mut app, "Zeb");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "0");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Form);
        let errors = app.form.as_ref().unwrap().errors.clone().unwrap();
        assert!(errors.has(Field::Level));
        assert!(!errors.has(Field::Name));
        assert!(app.status_is_error);
        assert!(app.store.document().accounts.is_empty());
    }

    #[test]
    fn edit_flow_updates_in_place() {
        let (_tmp, mut app) = app_with(&[("Zeb", 50, Server::Blue, CharacterClass::Bard)]);
        app.cursor = 1;
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "51");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.status_message.as_deref(), Some("updated Zeb"));
        assert_eq!(app.store.find_by_name("Zeb").unwrap().level, 51);
        assert_eq!(app.store.document().accounts.len(), 1);
        assert_eq!(app.cursor_character().unwrap().level, 51);
    }

    #[test]
    fn esc_discards_the_form() {
        let (_tmp, mut app) = app_with(&[]);
        open_add(&mut app);
        type_str(&mut app, "Zeb");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.form.is_none());
        assert!(app.store.document().accounts.is_empty());
    }
}
