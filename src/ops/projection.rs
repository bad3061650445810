use serde::Serialize;

use crate::model::{Character, CharacterClass, RosterDocument, Server, ServerFilter};
use crate::util::unicode;

/// Extra cells the list needs beyond the widest label (server tag, star, padding)
const LIST_WIDTH_MARGIN: usize = 16;

/// Upper bound on the preferred list width
pub const MAX_LIST_WIDTH: usize = 60;

/// Immutable view model for one character in one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterRow {
    pub id: String,
    pub name: String,
    pub level: i64,
    pub server: Server,
    pub class: CharacterClass,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub is_favorite: bool,
    pub is_selected: bool,
}

impl CharacterRow {
    fn from_character(c: &Character, doc: &RosterDocument, selected: Option<&str>) -> Self {
        CharacterRow {
            id: c.id.clone(),
            name: c.name.clone(),
            level: c.level,
            server: c.server,
            class: c.class,
            username: c.username.clone(),
            password: c.password.clone(),
            note: c.note.clone(),
            is_favorite: doc.is_favorite(&c.id),
            is_selected: selected == Some(c.id.as_str()),
        }
    }

    /// `Name (Lvl 50)`
    pub fn short_label(&self) -> String {
        format!("{} (Lvl {})", self.name, self.level)
    }

    /// `Name - Class (Lvl 50)`
    pub fn long_label(&self) -> String {
        format!("{} - {} (Lvl {})", self.name, self.class, self.level)
    }
}

/// One class group. `count` and `rows` are filled even when collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassBucket {
    pub class: CharacterClass,
    pub count: usize,
    pub expanded: bool,
    pub rows: Vec<CharacterRow>,
}

/// The grouped, filtered, sorted view of the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub filter: ServerFilter,
    /// Most recently selected first
    pub recent: Vec<CharacterRow>,
    /// Sorted by name
    pub favorites: Vec<CharacterRow>,
    /// All 14 classes, canonical order
    pub classes: Vec<ClassBucket>,
}

/// Build the projection for `filter`. A character can show up in Recent,
/// Favorites and its class group at the same time. Dangling recent/favorite
/// ids are skipped.
pub fn visible_groups(
    doc: &RosterDocument,
    filter: ServerFilter,
    selected: Option<&str>,
) -> Projection {
    let lookup = |id: &String| doc.accounts.iter().find(|c| &c.id == id);
    let row = |c: &Character| CharacterRow::from_character(c, doc, selected);

    let recent = doc
        .recent
        .iter()
        .rev()
        .filter_map(lookup)
        .filter(|c| filter.matches(c.server))
        .map(row)
        .collect();

    let mut favorites: Vec<CharacterRow> = doc
        .favorites
        .iter()
        .filter_map(lookup)
        .filter(|c| filter.matches(c.server))
        .map(row)
        .collect();
    favorites.sort_by(|a, b| a.name.cmp(&b.name));

    let classes = CharacterClass::ALL
        .iter()
        .map(|&class| {
            let mut rows: Vec<CharacterRow> = doc
                .accounts
                .iter()
                .filter(|c| c.class == class && filter.matches(c.server))
                .map(row)
                .collect();
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            ClassBucket {
                class,
                count: rows.len(),
                expanded: doc.is_expanded(class),
                rows,
            }
        })
        .collect();

    Projection {
        filter,
        recent,
        favorites,
        classes,
    }
}

// ---------------------------------------------------------------------------
// Flattened rows and the view anchor
// ---------------------------------------------------------------------------

/// Which list section a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Recent,
    Favorites,
    Class(CharacterClass),
}

/// A row of the rendered list, top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRow {
    /// "Recent" or "Favorites" heading (only emitted when the bucket has rows)
    SectionHeader(Bucket),
    ClassHeader {
        class: CharacterClass,
        count: usize,
        expanded: bool,
    },
    Character { bucket: Bucket, row: CharacterRow },
}

impl ListRow {
    /// Identity of this row that survives a rebuild
    pub fn key(&self) -> (Bucket, Option<&str>) {
        match self {
            ListRow::SectionHeader(bucket) => (*bucket, None),
            ListRow::ClassHeader { class, .. } => (Bucket::Class(*class), None),
            ListRow::Character { bucket, row } => (*bucket, Some(row.id.as_str())),
        }
    }
}

/// Flatten a projection into display rows. Collapsed classes keep their
/// header (with count) but contribute no character rows.
pub fn flatten(projection: &Projection) -> Vec<ListRow> {
    let mut rows = Vec::new();

    for (bucket, members) in [
        (Bucket::Recent, &projection.recent),
        (Bucket::Favorites, &projection.favorites),
    ] {
        if members.is_empty() {
            continue;
        }
        rows.push(ListRow::SectionHeader(bucket));
        rows.extend(members.iter().map(|row| ListRow::Character {
            bucket,
            row: row.clone(),
        }));
    }

    for group in &projection.classes {
        rows.push(ListRow::ClassHeader {
            class: group.class,
            count: group.count,
            expanded: group.expanded,
        });
        if group.expanded {
            let bucket = Bucket::Class(group.class);
            rows.extend(group.rows.iter().map(|row| ListRow::Character {
                bucket,
                row: row.clone(),
            }));
        }
    }

    rows
}

/// The class group that stands for "where the user is scrolled to"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewAnchor {
    pub class: CharacterClass,
}

/// Anchor for a viewport whose first visible row is `top`: the last class
/// header at or above it. None while Recent/Favorites are still on top.
pub fn anchor_at(rows: &[ListRow], top: usize) -> Option<ViewAnchor> {
    rows.iter()
        .take(top.saturating_add(1))
        .filter_map(|row| match row {
            ListRow::ClassHeader { class, .. } => Some(ViewAnchor { class: *class }),
            _ => None,
        })
        .last()
}

/// Row index to scroll to so `anchor` is back on top (0 when there is none)
pub fn anchor_row(rows: &[ListRow], anchor: Option<ViewAnchor>) -> usize {
    let Some(anchor) = anchor else {
        return 0;
    };
    rows.iter()
        .position(|row| matches!(row, ListRow::ClassHeader { class, .. } if *class == anchor.class))
        .unwrap_or(0)
}

/// Width in cells the list wants so the widest `Name (Lvl N)` label fits
/// next to its server tag, capped at MAX_LIST_WIDTH
pub fn preferred_list_width<'a>(characters: impl IntoIterator<Item = &'a Character>) -> usize {
    characters
        .into_iter()
        .map(|c| unicode::display_width(&c.short_label()) + LIST_WIDTH_MARGIN)
        .max()
        .unwrap_or(0)
        .min(MAX_LIST_WIDTH)
}
