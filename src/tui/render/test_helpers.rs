use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::model::{CharacterClass, RosterConfig, Server};
use crate::ops::validate::CharacterForm;
use crate::store::RosterStore;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Form input for a character whose credentials derive from its name:
/// `zeb_acct` / `secret-zeb` for "Zeb".
pub fn form_for(name: &str, level: i64, server: Server, class: CharacterClass) -> CharacterForm {
    let lower = name.to_lowercase();
    CharacterForm {
        name: name.to_string(),
        level: level.to_string(),
        server: server.label().to_string(),
        class: class.label().to_string(),
        username: format!("{}_acct", lower),
        password: format!("secret-{}", lower),
        note: String::new(),
    }
}

/// Build an App over a fresh roster file holding `chars`, added in order.
/// Keep the TempDir alive for as long as the App is used.
pub fn app_with(chars: &[(&str, i64, Server, CharacterClass)]) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    let (mut store, _) = RosterStore::open(&tmp.path().join("act.txt"));
    for (name, level, server, class) in chars {
        store
            .add(&form_for(name, *level, *server, *class))
            .unwrap();
    }
    let app = App::new(store, &RosterConfig::default());
    (tmp, app)
}
