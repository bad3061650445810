use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) | (KeyModifiers::SHIFT, KeyCode::Char('Y')) => {
            let state = app.confirm.take();
            app.mode = Mode::Navigate;
            if let Some(state) = state {
                let anchor = app.current_anchor();
                let result = app.store.delete(&state.id);
                app.rebuild(anchor);
                match result {
                    Ok(removed) => app.set_status(format!("deleted {}", removed.name)),
                    Err(e) => app.report(&e),
                }
            }
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.confirm = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}
