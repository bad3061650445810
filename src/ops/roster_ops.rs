use std::path::PathBuf;

use crate::model::{Character, CharacterClass, RECENT_LIMIT, RosterDocument, WindowPosition};
use crate::ops::validate::{ValidCharacter, ValidationError};

/// Prefix for generated character ids (`C-001`, `C-002`, ...)
pub const ID_PREFIX: &str = "C";

/// Lowest and highest window opacity accepted
pub const ALPHA_RANGE: (f64, f64) = (0.1, 1.0);

/// Error type for roster operations
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("character not found: {0}")]
    NotFound(String),
    #[error("could not save {path}: {source}")]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} could not be read at startup; changes are not saved to it")]
    Unwritable { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// The next free id: one past the highest `C-NNN` in use
pub fn next_character_id(doc: &RosterDocument) -> String {
    let prefix_dash = format!("{}-", ID_PREFIX);
    let max = doc
        .accounts
        .iter()
        .filter_map(|c| c.id.strip_prefix(&prefix_dash))
        .filter_map(|n| n.parse::<usize>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{:03}", ID_PREFIX, max + 1)
}

/// Give every record without an id (or with a duplicate one) a fresh id.
/// Returns how many records changed.
pub fn assign_missing_ids(doc: &mut RosterDocument) -> usize {
    let mut seen: Vec<String> = Vec::new();
    let mut needs_id = Vec::new();
    for (idx, c) in doc.accounts.iter().enumerate() {
        if c.id.is_empty() || seen.contains(&c.id) {
            needs_id.push(idx);
        } else {
            seen.push(c.id.clone());
        }
    }
    for &idx in &needs_id {
        let id = next_character_id(doc);
        doc.accounts[idx].id = id;
    }
    needs_id.len()
}

/// Map `recent`/`favorites` entries written as character names (older files)
/// onto ids. Entries that match neither an id nor a name are left alone.
pub fn resolve_name_keys(doc: &mut RosterDocument) {
    let resolve = |key: &String, accounts: &[Character]| -> String {
        if accounts.iter().any(|c| &c.id == key) {
            return key.clone();
        }
        accounts
            .iter()
            .find(|c| &c.name == key)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| key.clone())
    };

    let recent: Vec<String> = doc
        .recent
        .iter()
        .map(|k| resolve(k, &doc.accounts))
        .collect();
    doc.recent.clear();
    for id in recent {
        push_recent(&mut doc.recent, &id);
    }

    let favorites: Vec<String> = doc
        .favorites
        .iter()
        .map(|k| resolve(k, &doc.accounts))
        .collect();
    doc.favorites.clear();
    for id in favorites {
        if !doc.favorites.contains(&id) {
            doc.favorites.push(id);
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find<'a>(doc: &'a RosterDocument, id: &str) -> Option<&'a Character> {
    doc.accounts.iter().find(|c| c.id == id)
}

/// First character with this exact name
pub fn find_by_name<'a>(doc: &'a RosterDocument, name: &str) -> Option<&'a Character> {
    doc.accounts.iter().find(|c| c.name == name)
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Append a new character. Returns its id.
pub fn add_character(doc: &mut RosterDocument, valid: ValidCharacter) -> String {
    let id = next_character_id(doc);
    doc.accounts.push(Character {
        id: id.clone(),
        name: valid.name,
        level: valid.level,
        server: valid.server,
        class: valid.class,
        username: valid.username,
        password: valid.password,
        note: valid.note,
    });
    id
}

/// Overwrite every editable field of a character in place. The id is kept,
/// so favorites and recency follow a rename.
pub fn update_character(
    doc: &mut RosterDocument,
    id: &str,
    valid: ValidCharacter,
) -> Result<(), RosterError> {
    let c = doc
        .accounts
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| RosterError::NotFound(id.to_string()))?;
    c.name = valid.name;
    c.level = valid.level;
    c.server = valid.server;
    c.class = valid.class;
    c.username = valid.username;
    c.password = valid.password;
    c.note = valid.note;
    Ok(())
}

/// Remove a character along with its favorite and recency entries
pub fn remove_character(doc: &mut RosterDocument, id: &str) -> Result<Character, RosterError> {
    let idx = doc
        .accounts
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| RosterError::NotFound(id.to_string()))?;
    let removed = doc.accounts.remove(idx);
    doc.favorites.retain(|f| f != id);
    doc.recent.retain(|r| r != id);
    Ok(removed)
}

/// Flip favorite membership. Returns true if the character is now a favorite.
pub fn toggle_favorite(doc: &mut RosterDocument, id: &str) -> Result<bool, RosterError> {
    if find(doc, id).is_none() {
        return Err(RosterError::NotFound(id.to_string()));
    }
    if doc.is_favorite(id) {
        doc.favorites.retain(|f| f != id);
        Ok(false)
    } else {
        doc.favorites.push(id.to_string());
        Ok(true)
    }
}

/// Flip one class group's expansion flag. Returns the new flag.
pub fn toggle_class_expansion(doc: &mut RosterDocument, class: CharacterClass) -> bool {
    let expanded = !doc.is_expanded(class);
    doc.expanded_classes.insert(class, expanded);
    expanded
}

/// Move `id` to the most-recent end of the queue, dropping the oldest
/// entries beyond RECENT_LIMIT.
pub fn push_recent(recent: &mut Vec<String>, id: &str) {
    recent.retain(|r| r != id);
    recent.push(id.to_string());
    if recent.len() > RECENT_LIMIT {
        let excess = recent.len() - RECENT_LIMIT;
        recent.drain(..excess);
    }
}

/// Record a selection in the recency queue
pub fn record_selection(doc: &mut RosterDocument, id: &str) -> Result<(), RosterError> {
    if find(doc, id).is_none() {
        return Err(RosterError::NotFound(id.to_string()));
    }
    push_recent(&mut doc.recent, id);
    Ok(())
}

pub fn set_window_position(doc: &mut RosterDocument, position: WindowPosition) {
    doc.window_position = position;
}

/// Set window opacity, clamped to ALPHA_RANGE. Returns the stored value.
pub fn set_alpha(doc: &mut RosterDocument, alpha: f64) -> f64 {
    let (lo, hi) = ALPHA_RANGE;
    let clamped = if alpha.is_nan() { hi } else { alpha.clamp(lo, hi) };
    doc.alpha = clamped;
    clamped
}
