use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Truncate to fit within `max_cells` terminal cells, ending in `…` when
/// anything was cut. Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = grapheme_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push(ELLIPSIS);
    out
}

/// Lay out `left` and `right` on one line of exactly `width` cells: `right`
/// flush against the right edge, `left` truncated to make room.
pub fn split_line(left: &str, right: &str, width: usize) -> String {
    let right_w = display_width(right);
    if right_w >= width {
        return truncate_to_width(right, width);
    }
    // One cell of breathing room between the two parts
    let left_room = width - right_w;
    let left_fit = if display_width(left) < left_room {
        left.to_string()
    } else {
        truncate_to_width(left, left_room.saturating_sub(1))
    };
    let gap = width - right_w - display_width(&left_fit);
    format!("{}{}{}", left_fit, " ".repeat(gap), right)
}

/// Next grapheme boundary after `byte_offset`. None at end of string.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    let rest = &s[byte_offset..];
    let step = rest.graphemes(true).next().map_or(rest.len(), str::len);
    Some(byte_offset + step)
}

/// Previous grapheme boundary before `byte_offset`. None at start of string.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

/// Display column of a byte offset (for placing the text cursor)
pub fn byte_offset_to_display_col(s: &str, byte_offset: usize) -> usize {
    display_width(&s[..byte_offset.min(s.len())])
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" { 4 } else { UnicodeWidthStr::width(g) }
}
