use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::load_config;
use crate::io::roster_io::{DATA_FILE, LoadOutcome, data_dir};
use crate::model::{CharacterClass, RosterConfig, Server};
use crate::ops::projection::{Bucket, CharacterRow, ListRow, ViewAnchor, anchor_at, anchor_row, flatten};
use crate::ops::roster_ops::RosterError;
use crate::ops::validate::{CharacterForm, Field, ValidationError};
use crate::store::RosterStore;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Add/Edit popup is open
    Form,
    /// y/n delete confirmation is open
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Edit { id: String },
}

/// Inputs of the Add/Edit popup, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Level,
    Username,
    Password,
    Note,
    Server,
    Class,
}

impl FormField {
    pub const ORDER: [FormField; 7] = [
        FormField::Name,
        FormField::Level,
        FormField::Username,
        FormField::Password,
        FormField::Note,
        FormField::Server,
        FormField::Class,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Level => "Level",
            FormField::Username => "Username",
            FormField::Password => "Password",
            FormField::Note => "Note",
            FormField::Server => "Server",
            FormField::Class => "Class",
        }
    }

    /// Server and Class are picked from a fixed list instead of typed
    pub fn is_choice(self) -> bool {
        matches!(self, FormField::Server | FormField::Class)
    }

    /// The validated field this input feeds (the note is never validated)
    pub fn field(self) -> Option<Field> {
        match self {
            FormField::Name => Some(Field::Name),
            FormField::Level => Some(Field::Level),
            FormField::Username => Some(Field::Username),
            FormField::Password => Some(Field::Password),
            FormField::Note => None,
            FormField::Server => Some(Field::Server),
            FormField::Class => Some(Field::Class),
        }
    }

    fn step(self, delta: isize) -> Self {
        let n = FormField::ORDER.len() as isize;
        let idx = FormField::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        FormField::ORDER[(idx + delta).rem_euclid(n) as usize]
    }
}

/// State of the open Add/Edit popup
#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub form: CharacterForm,
    pub focus: FormField,
    /// Byte offset of the text cursor in the focused field
    pub cursor: usize,
    /// Problems from the last submit
    pub errors: Option<ValidationError>,
}

impl FormState {
    pub fn new(kind: FormKind, form: CharacterForm) -> Self {
        let cursor = form.name.len();
        FormState {
            kind,
            form,
            focus: FormField::Name,
            cursor,
            errors: None,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.form.name,
            FormField::Level => &self.form.level,
            FormField::Username => &self.form.username,
            FormField::Password => &self.form.password,
            FormField::Note => &self.form.note,
            FormField::Server => &self.form.server,
            FormField::Class => &self.form.class,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.form.name,
            FormField::Level => &mut self.form.level,
            FormField::Username => &mut self.form.username,
            FormField::Password => &mut self.form.password,
            FormField::Note => &mut self.form.note,
            FormField::Server => &mut self.form.server,
            FormField::Class => &mut self.form.class,
        }
    }

    /// Move focus by `delta` fields (wrapping); the cursor goes to the end
    pub fn move_focus(&mut self, delta: isize) {
        self.focus = self.focus.step(delta);
        self.cursor = self.value(self.focus).len();
    }

    /// Pick the next/previous choice for the focused Server or Class field.
    /// An empty or unknown value starts from the first/last entry.
    pub fn cycle_choice(&mut self, delta: isize) {
        let labels: Vec<&'static str> = match self.focus {
            FormField::Server => Server::ALL.iter().map(|s| s.label()).collect(),
            FormField::Class => CharacterClass::ALL.iter().map(|c| c.label()).collect(),
            _ => return,
        };
        let n = labels.len() as isize;
        let current = self.value(self.focus).trim().to_string();
        let next = match labels.iter().position(|l| l.eq_ignore_ascii_case(&current)) {
            Some(idx) => (idx as isize + delta).rem_euclid(n) as usize,
            None if delta >= 0 => 0,
            None => (n - 1) as usize,
        };
        let value = labels[next].to_string();
        self.cursor = value.len();
        *self.value_mut(self.focus) = value;
    }

    /// Error text for one input, if the last submit flagged it
    pub fn error_for(&self, field: FormField) -> Option<String> {
        let errors = self.errors.as_ref()?;
        errors.message_for(field.field()?)
    }
}

/// A pending delete waiting for y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub id: String,
    pub name: String,
}

/// Identity of the cursor row that survives a rebuild
type RowKey = (Bucket, Option<String>);

fn row_key(row: &ListRow) -> RowKey {
    let (bucket, id) = row.key();
    (bucket, id.map(str::to_string))
}

/// Main application state
pub struct App {
    pub store: RosterStore,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Flattened list, rebuilt from a fresh projection after every change
    pub rows: Vec<ListRow>,
    /// Cursor index into `rows`
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    pub show_help: bool,
    pub show_key_hints: bool,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub form: Option<FormState>,
    pub confirm: Option<ConfirmState>,
}

impl App {
    pub fn new(store: RosterStore, config: &RosterConfig) -> Self {
        let mut app = App {
            store,
            theme: Theme::from_config(&config.ui),
            mode: Mode::Navigate,
            should_quit: false,
            rows: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            status_message: None,
            status_is_error: false,
            form: None,
            confirm: None,
        };
        app.rows = flatten(&app.store.projection());
        app
    }

    /// The class group currently at the top of the viewport
    pub fn current_anchor(&self) -> Option<ViewAnchor> {
        anchor_at(&self.rows, self.scroll_offset)
    }

    /// Re-project and re-flatten. The viewport goes back to `anchor`; the
    /// cursor stays on the same row if it still exists, otherwise it lands on
    /// the anchor row.
    pub fn rebuild(&mut self, anchor: Option<ViewAnchor>) {
        let key = self.rows.get(self.cursor).map(row_key);
        self.rows = flatten(&self.store.projection());
        self.scroll_offset = anchor_row(&self.rows, anchor);
        self.cursor = key
            .and_then(|k| self.rows.iter().position(|r| row_key(r) == k))
            .unwrap_or(self.scroll_offset);
        self.clamp_cursor();
    }

    /// Put the cursor on a specific row if it is present
    pub fn focus_row(&mut self, bucket: Bucket, id: &str) {
        if let Some(idx) = self
            .rows
            .iter()
            .position(|r| r.key() == (bucket, Some(id)))
        {
            self.cursor = idx;
        }
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
        self.scroll_offset = self.scroll_offset.min(self.rows.len().saturating_sub(1));
    }

    pub fn cursor_row(&self) -> Option<&ListRow> {
        self.rows.get(self.cursor)
    }

    pub fn cursor_character(&self) -> Option<&CharacterRow> {
        match self.cursor_row()? {
            ListRow::Character { row, .. } => Some(row),
            _ => None,
        }
    }

    /// The character an action applies to: the one under the cursor, or the
    /// selected one when the cursor is on a heading. Returns (id, name).
    pub fn target_character(&self) -> Option<(String, String)> {
        if let Some(row) = self.cursor_character() {
            return Some((row.id.clone(), row.name.clone()));
        }
        self.store
            .selected()
            .map(|c| (c.id.clone(), c.name.clone()))
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = true;
    }

    /// Show a store error in the status row
    pub fn report(&mut self, err: &RosterError) {
        self.set_error(err.to_string());
    }
}

/// Run the TUI against `path` (or `act.txt` in the working directory)
pub fn run(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = path.unwrap_or(Path::new(DATA_FILE));
    let (store, outcome) = RosterStore::open(path);
    let config = load_config(&data_dir(path));

    let mut app = App::new(store, &config);
    match outcome {
        LoadOutcome::Loaded => {}
        LoadOutcome::CreatedDefault => {
            app.set_status(format!("created {}", path.display()));
        }
        LoadOutcome::ReplacedCorrupt => {
            app.set_error(format!(
                "{} was unreadable and has been reset (old content is in the recovery log)",
                path.display()
            ));
        }
        LoadOutcome::Unreadable => {
            app.set_error(format!(
                "could not read {}; changes will not be saved",
                path.display()
            ));
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Shutdown flush; a failure here is already in the recovery log
    if let Err(e) = app.store.save() {
        eprintln!("warning: {}", e);
    }

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
