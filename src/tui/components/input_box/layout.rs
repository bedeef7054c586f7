//! Character-grid layout for the prompt field.
//!
//! The prompt wraps hard at the column limit (no word wrapping), so the
//! cursor's screen position can be computed exactly from its byte offset.
//! A logical line of `n` chars at width `w` always takes `n / w + 1` rows,
//! leaving room for the cursor after the last character.

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + padding)
pub(super) const CONTENT_OFFSET_X: u16 = 2;
pub(super) const CONTENT_OFFSET_Y: u16 = 1;

/// Usable text columns inside the block. Never 0.
pub(super) fn inner_width(area_width: u16) -> usize {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD).max(1) as usize
}

/// Splits `text` into display rows of at most `width` chars.
pub(super) fn wrap_rows(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        let row_count = chars.len() / width + 1;
        for i in 0..row_count {
            let start = i * width;
            let end = ((i + 1) * width).min(chars.len());
            rows.push(chars[start..end].iter().collect());
        }
    }
    rows
}

/// (column, row) of the cursor at byte offset `pos`.
pub(super) fn cursor_cell(text: &str, pos: usize, width: usize) -> (usize, usize) {
    let before = &text[..pos];
    let mut row = 0;
    let mut lines = before.split('\n').peekable();
    while let Some(line) = lines.next() {
        let len = line.chars().count();
        if lines.peek().is_none() {
            return (len % width, row + len / width);
        }
        row += len / width + 1;
    }
    (0, row)
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
