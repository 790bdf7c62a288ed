#![forbid(unsafe_code)]

//! Test tooling for cform models.
//!
//! - **Queries**: [`Screen`] finds nodes in a frame's accessibility tree by
//!   placeholder, label, role, or visible text, the way a user would.
//! - **Interaction**: [`UserSession`] drives a model through clicks and
//!   typing, re-rendering after every action.
//! - **Text capture**: [`buffer_to_text`] and [`assert_text_matches`]
//!   compare rendered output against inline expectations.
//!
//! # Quick Start
//!
//! ```ignore
//! use cform_harness::{TextMatch, UserSession};
//!
//! let mut user = UserSession::new(ContactFormApp::default());
//! let first = user.screen().get_by_placeholder("Edd").area;
//! user.type_into(first, "Bill");
//! user.screen()
//!     .get_by_text(TextMatch::contains("at least 5 characters"));
//! ```

pub mod screen;
pub mod user;

use std::fmt::Write as FmtWrite;

use cform_render::buffer::Buffer;

pub use screen::{Screen, TextMatch};
pub use user::UserSession;

/// Plain text of a buffer, one line per row, rows joined by `\n`.
///
/// Empty cells become spaces; continuation cells are skipped.
pub fn buffer_to_text(buf: &Buffer) -> String {
    let mut out = String::with_capacity((buf.width() as usize + 1) * buf.height() as usize);
    for (y, row) in buf.rows().enumerate() {
        if y > 0 {
            out.push('\n');
        }
        out.push_str(&row);
    }
    out
}

/// Comparison mode for text assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Byte-exact string comparison.
    Exact,
    /// Trim trailing whitespace on each line, and trailing blank lines.
    TrimTrailing,
    /// Collapse all whitespace runs to single spaces and trim each line.
    Fuzzy,
}

fn normalize(text: &str, mode: MatchMode) -> String {
    match mode {
        MatchMode::Exact => text.to_string(),
        MatchMode::TrimTrailing => text
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end_matches('\n')
            .to_string(),
        MatchMode::Fuzzy => text
            .lines()
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end_matches('\n')
            .to_string(),
    }
}

/// Line-by-line diff. ` ` marks equal lines, `-` lines only in `expected`,
/// `+` lines only in `actual`. Empty when the inputs are identical.
pub fn diff_text(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    let mut out = String::new();
    let mut has_diff = false;
    for i in 0..expected_lines.len().max(actual_lines.len()) {
        let line = match (expected_lines.get(i), actual_lines.get(i)) {
            (Some(e), Some(a)) if e == a => format!(" {e}"),
            (Some(e), Some(a)) => {
                has_diff = true;
                format!("-{e}\n+{a}")
            }
            (Some(e), None) => {
                has_diff = true;
                format!("-{e}")
            }
            (None, Some(a)) => {
                has_diff = true;
                format!("+{a}")
            }
            (None, None) => continue,
        };
        let _ = writeln!(out, "{line}");
    }
    if has_diff { out } else { String::new() }
}

/// Assert that a buffer's text equals `expected` under `mode`.
///
/// # Panics
///
/// On mismatch, with a diff of the normalized text.
pub fn assert_text_matches(buf: &Buffer, expected: &str, mode: MatchMode) {
    let actual = normalize(&buffer_to_text(buf), mode);
    let expected = normalize(expected, mode);
    if actual != expected {
        let diff = diff_text(&expected, &actual);
        panic!(
            "\n=== Text mismatch ({w}x{h}, {mode:?}) ===\nDiff (- expected, + actual):\n{diff}",
            w = buf.width(),
            h = buf.height(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cform_render::cell::Cell;

    fn buffer(rows: &[&str]) -> Buffer {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u16;
        let mut buf = Buffer::new(width, rows.len() as u16);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c != ' ' {
                    buf.set(x as u16, y as u16, Cell::from_char(c));
                }
            }
        }
        buf
    }

    #[test]
    fn buffer_to_text_pads_empty_cells() {
        let buf = buffer(&["ab ", " c "]);
        assert_eq!(buffer_to_text(&buf), "ab \n c ");
    }

    #[test]
    fn buffer_to_text_skips_wide_continuations() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('日'));
        buf.set(2, 0, Cell::from_char('x'));
        assert_eq!(buffer_to_text(&buf), "日x ");
    }

    #[test]
    fn diff_marks_changes() {
        assert_eq!(diff_text("a\nb", "a\nb"), "");
        assert_eq!(diff_text("a\nb", "a\nc"), " a\n-b\n+c\n");
        assert_eq!(diff_text("a", "a\nz"), " a\n+z\n");
    }

    #[test]
    fn modes_normalize_whitespace() {
        assert_eq!(normalize("x  \ny \n\n", MatchMode::TrimTrailing), "x\ny");
        assert_eq!(normalize(" a   b ", MatchMode::Fuzzy), "a b");
        assert_eq!(normalize("a ", MatchMode::Exact), "a ");
    }

    #[test]
    fn assert_text_matches_trailing() {
        let buf = buffer(&["hi  ", "    "]);
        assert_text_matches(&buf, "hi", MatchMode::TrimTrailing);
    }

    #[test]
    #[should_panic(expected = "Text mismatch")]
    fn assert_text_matches_reports_mismatch() {
        let buf = buffer(&["hi"]);
        assert_text_matches(&buf, "ho", MatchMode::Exact);
    }
}
