use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Narrowest and widest a table column is drawn, in display columns.
pub(crate) const MIN_COL_WIDTH: usize = 3;
pub(crate) const MAX_COL_WIDTH: usize = 40;

/// Display width of a string (CJK and emoji count double).
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to at most `width` display columns, ending in ".." when cut.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .find(|ch| ch.width().unwrap_or(0) <= width)
            .map(|ch| ch.to_string())
            .unwrap_or_default();
    }

    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }
    format!("{}..", &s[..end_byte])
}

/// Pad (or truncate) to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        let cut = truncate_display(s, width);
        let cw = display_width(&cut);
        format!("{}{}", cut, " ".repeat(width.saturating_sub(cw)))
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// Column widths for a text grid: widest of header and cells, clamped.
pub(crate) fn column_widths<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .map(|(c, name)| {
            let widest_cell = rows
                .iter()
                .filter_map(|row| row.get(c))
                .map(|s| display_width(s))
                .max()
                .unwrap_or(0);
            display_width(name.as_ref())
                .max(widest_cell)
                .clamp(MIN_COL_WIDTH, MAX_COL_WIDTH)
        })
        .collect()
}
