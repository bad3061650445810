use std::path::{Path, PathBuf};

use crate::io::roster_io::{self, LoadOutcome};
use crate::model::{Character, CharacterClass, RosterDocument, ServerFilter, WindowPosition};
use crate::ops::projection::{self, Projection, ViewAnchor};
use crate::ops::roster_ops::{self, RosterError};
use crate::ops::validate::{CharacterForm, validate};

/// The roster: the persisted document plus the selection, bound to one data
/// file. Every mutation writes the whole document back before returning.
///
/// A failed save leaves the in-memory change in place (the serialized
/// document is in the recovery log) and reports `RosterError::Save`.
#[derive(Debug)]
pub struct RosterStore {
    path: PathBuf,
    doc: RosterDocument,
    selected: Option<String>,
    /// Set when the file existed but could not be read; saves are refused
    read_only: bool,
}

impl RosterStore {
    /// Load `path`, falling back to a default document. A file that exists
    /// but cannot be read makes the store read-only.
    pub fn open(path: &Path) -> (Self, LoadOutcome) {
        let (doc, outcome) = roster_io::load_or_default(path);
        let mut store = Self::from_document(path, doc);
        store.read_only = outcome == LoadOutcome::Unreadable;
        (store, outcome)
    }

    /// A store over an already loaded document. Nothing is written until the
    /// first mutation.
    pub fn from_document(path: &Path, doc: RosterDocument) -> Self {
        RosterStore {
            path: path.to_path_buf(),
            doc,
            selected: None,
            read_only: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &RosterDocument {
        &self.doc
    }

    pub fn filter(&self) -> ServerFilter {
        self.doc.last_server
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Character> {
        self.selected
            .as_deref()
            .and_then(|id| roster_ops::find(&self.doc, id))
    }

    pub fn get(&self, id: &str) -> Option<&Character> {
        roster_ops::find(&self.doc, id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Character> {
        roster_ops::find_by_name(&self.doc, name)
    }

    /// Projection under the current filter
    pub fn projection(&self) -> Projection {
        self.visible_groups(self.filter())
    }

    /// Projection under any filter. Does not change the current one.
    pub fn visible_groups(&self, filter: ServerFilter) -> Projection {
        projection::visible_groups(&self.doc, filter, self.selected_id())
    }

    /// Write the whole document to disk
    pub fn save(&self) -> Result<(), RosterError> {
        if self.read_only {
            return Err(roster_io::refuse_write(&self.path, &self.doc));
        }
        roster_io::write_document(&self.path, &self.doc)
    }

    /// Validate and append a new character. Returns its id.
    pub fn add(&mut self, form: &CharacterForm) -> Result<String, RosterError> {
        let valid = validate(form)?;
        let id = roster_ops::add_character(&mut self.doc, valid);
        self.save()?;
        Ok(id)
    }

    /// Validate and overwrite an existing character. `anchor` is handed back
    /// so the caller can restore its scroll position on the rebuilt view.
    pub fn edit(
        &mut self,
        id: &str,
        form: &CharacterForm,
        anchor: Option<ViewAnchor>,
    ) -> Result<Option<ViewAnchor>, RosterError> {
        let valid = validate(form)?;
        roster_ops::update_character(&mut self.doc, id, valid)?;
        self.save()?;
        Ok(anchor)
    }

    /// Remove a character. Confirmation is the caller's job.
    pub fn delete(&mut self, id: &str) -> Result<Character, RosterError> {
        let removed = roster_ops::remove_character(&mut self.doc, id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.save()?;
        Ok(removed)
    }

    /// Returns true if the character is now a favorite
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, RosterError> {
        let now = roster_ops::toggle_favorite(&mut self.doc, id)?;
        self.save()?;
        Ok(now)
    }

    /// Returns the class's new expansion flag
    pub fn toggle_class_expansion(&mut self, class: CharacterClass) -> Result<bool, RosterError> {
        let expanded = roster_ops::toggle_class_expansion(&mut self.doc, class);
        self.save()?;
        Ok(expanded)
    }

    /// Make `id` the selected character and the most recent one
    pub fn select(&mut self, id: &str) -> Result<(), RosterError> {
        roster_ops::record_selection(&mut self.doc, id)?;
        self.selected = Some(id.to_string());
        self.save()
    }

    /// Switch the server filter. `anchor` is handed back for the rebuilt view.
    pub fn set_server_filter(
        &mut self,
        filter: ServerFilter,
        anchor: Option<ViewAnchor>,
    ) -> Result<Option<ViewAnchor>, RosterError> {
        self.doc.last_server = filter;
        self.save()?;
        Ok(anchor)
    }

    pub fn set_window_position(&mut self, position: WindowPosition) -> Result<(), RosterError> {
        roster_ops::set_window_position(&mut self.doc, position);
        self.save()
    }

    /// Returns the stored (clamped) opacity
    pub fn set_alpha(&mut self, alpha: f64) -> Result<f64, RosterError> {
        let stored = roster_ops::set_alpha(&mut self.doc, alpha);
        self.save()?;
        Ok(stored)
    }

    /// Width the list column would like, from the widest label among the
    /// characters the current filter shows
    pub fn preferred_list_width(&self) -> usize {
        let filter = self.filter();
        projection::preferred_list_width(
            self.doc
                .accounts
                .iter()
                .filter(|c| filter.matches(c.server)),
        )
    }
}
