use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::character::{Character, CharacterClass, ServerFilter};

/// Maximum number of entries kept in the recency queue
pub const RECENT_LIMIT: usize = 3;

/// Window opacity used when the file has none
pub const DEFAULT_ALPHA: f64 = 0.95;

/// Saved window geometry (used by graphical front ends; the TUI passes it through)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowPosition {
    fn default() -> Self {
        WindowPosition {
            x: 1000,
            y: 100,
            width: 420,
            height: 700,
        }
    }
}

/// The persisted roster (written to `act.txt`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterDocument {
    #[serde(default)]
    pub accounts: Vec<Character>,
    /// Recently selected character ids, oldest first
    #[serde(default)]
    pub recent: Vec<String>,
    /// Favorite character ids (no duplicates)
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub last_server: ServerFilter,
    #[serde(default)]
    pub window_position: WindowPosition,
    #[serde(default = "default_expanded_classes")]
    pub expanded_classes: IndexMap<CharacterClass, bool>,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for RosterDocument {
    fn default() -> Self {
        RosterDocument {
            accounts: Vec::new(),
            recent: Vec::new(),
            favorites: Vec::new(),
            last_server: ServerFilter::All,
            window_position: WindowPosition::default(),
            expanded_classes: default_expanded_classes(),
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl RosterDocument {
    /// Whether a class group is expanded. Classes missing from the map are.
    pub fn is_expanded(&self, class: CharacterClass) -> bool {
        self.expanded_classes.get(&class).copied().unwrap_or(true)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }
}

fn default_expanded_classes() -> IndexMap<CharacterClass, bool> {
    CharacterClass::ALL.iter().map(|c| (*c, true)).collect()
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_takes_all_defaults() {
        let doc: RosterDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, RosterDocument::default());
        assert_eq!(doc.window_position.x, 1000);
        assert_eq!(doc.window_position.height, 700);
        assert_eq!(doc.alpha, 0.95);
        assert_eq!(doc.expanded_classes.len(), 14);
        assert!(doc.expanded_classes.values().all(|v| *v));
    }

    #[test]
    fn partial_expansion_map_defaults_missing_classes_to_expanded() {
        let doc: RosterDocument =
            serde_json::from_str(r#"{"expanded_classes":{"Bard":false}}"#).unwrap();
        assert!(!doc.is_expanded(CharacterClass::Bard));
        assert!(doc.is_expanded(CharacterClass::Wizard));
    }

    #[test]
    fn expansion_map_serializes_in_class_order() {
        let json = serde_json::to_string(&RosterDocument::default()).unwrap();
        let bard = json.find("\"Bard\"").unwrap();
        let knight = json.find("\"Shadow Knight\"").unwrap();
        let wizard = json.find("\"Wizard\"").unwrap();
        assert!(bard < knight && knight < wizard);
    }

    #[test]
    fn last_server_parses_from_label() {
        let doc: RosterDocument = serde_json::from_str(r#"{"last_server":"Green"}"#).unwrap();
        assert_eq!(doc.last_server, ServerFilter::Green);
    }
}
