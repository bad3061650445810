use crate::ops::projection::{CharacterRow, Projection};
use crate::util::unicode::split_line;

/// Width of a character's summary line in text output
const LINE_WIDTH: usize = 48;

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `Zeb (Lvl 50)               Blue ★`, then the credential lines
pub fn format_character(row: &CharacterRow, label: &str) -> Vec<String> {
    let star = if row.is_favorite { '\u{2605}' } else { '\u{2606}' };
    let right = format!("{} {}", row.server, star);
    let mut lines = vec![format!("  {}", split_line(label, &right, LINE_WIDTH))];
    if let Some(note) = &row.note {
        lines.push(format!("    {}", note));
    }
    lines.push(format!("    User: {}", row.username));
    lines.push(format!("    Pass: {}", row.password));
    lines
}

/// Recent, Favorites, then all 14 classes in order with their counts, empty
/// ones included. Text output lists collapsed classes in full.
pub fn format_projection(projection: &Projection) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", projection.filter)];

    for (title, rows) in [
        ("Recent", &projection.recent),
        ("Favorites", &projection.favorites),
    ] {
        if rows.is_empty() {
            continue;
        }
        lines.push(title.to_string());
        for row in rows {
            lines.extend(format_character(row, &row.long_label()));
        }
    }

    for group in &projection.classes {
        lines.push(format!("{} ({})", group.class, group.count));
        for row in &group.rows {
            lines.extend(format_character(row, &row.short_label()));
        }
    }
    lines
}
