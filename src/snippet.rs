//! Snippet fingerprinting and normalization.
//!
//! Both sides of every comparison (the stored fingerprint and the freshly
//! fetched file) pass through [`normalize`] first, so indentation and
//! line-ending differences never register as changes. The documented cost
//! is that formatting-only edits go unreported.

use crate::error::{Result, WatchError};

/// Canonicalize text for comparison: unify line endings to `\n`, trim
/// leading/trailing whitespace from every line independently, rejoin with a
/// single `\n`. Idempotent.
pub fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Select lines `[start, end]` (1-based, inclusive) from `text`, exactly as
/// they appear in the fetched file.
///
/// Bounds are validated against the file: `start >= 1`, `end >= 2`, and both
/// within the line count. An inverted range is rejected the same way rather
/// than panicking.
pub fn capture_lines(text: &str, start: usize, end: usize) -> Result<Vec<String>> {
    let lines: Vec<&str> = text.lines().collect();
    let out_of_bounds = start < 1 || end < 2 || start > end || end > lines.len();
    if out_of_bounds {
        return Err(WatchError::RangeOutOfBounds {
            start,
            end,
            line_count: lines.len(),
        });
    }
    Ok(lines[start - 1..end].iter().map(ToString::to_string).collect())
}

/// Whether the captured snippet still occurs in the current file content,
/// after normalizing both sides.
///
/// Containment is a substring check, not positional equality: if the exact
/// snippet text occurs anywhere in the file unmodified, it counts as present
/// even when the originally captured occurrence was altered. Operators are
/// advised to pick sufficiently unique ranges.
pub fn contains_snippet(current_file: &str, captured_lines: &[String]) -> bool {
    let fingerprint = normalize(&captured_lines.join("\n"));
    normalize(current_file).contains(&fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unifies_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_normalize_trims_each_line() {
        assert_eq!(normalize("  fn main() {  \n\t  let x = 1;\n}"), "fn main() {\nlet x = 1;\n}");
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize("  a \r\n\tb\t\r c ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_capture_lines_inclusive_bounds() {
        let text = "one\ntwo\nthree\nfour\nfive";
        let captured = capture_lines(text, 2, 4).unwrap();
        assert_eq!(captured, vec!["two", "three", "four"]);
        assert_eq!(captured.len(), 4 - 2 + 1);
    }

    #[test]
    fn test_capture_lines_whole_file() {
        let captured = capture_lines("a\nb", 1, 2).unwrap();
        assert_eq!(captured, vec!["a", "b"]);
    }

    #[test]
    fn test_capture_lines_boundary_failures() {
        let text = "one\ntwo\nthree";
        assert!(matches!(
            capture_lines(text, 0, 2),
            Err(WatchError::RangeOutOfBounds { .. })
        ));
        assert!(matches!(
            capture_lines(text, 1, 1),
            Err(WatchError::RangeOutOfBounds { .. })
        ));
        assert!(matches!(
            capture_lines(text, 2, 9),
            Err(WatchError::RangeOutOfBounds { .. })
        ));
        assert!(matches!(
            capture_lines(text, 3, 2),
            Err(WatchError::RangeOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_contains_snippet_ignores_indentation() {
        let captured = vec!["a > 0".to_string()];
        assert!(contains_snippet("if x {\n      a > 0  \n}", &captured));
    }

    #[test]
    fn test_contains_snippet_multi_line() {
        let captured = vec!["let a = 1;".to_string(), "let b = 2;".to_string()];
        assert!(contains_snippet("fn f() {\n  let a = 1;\r\n  let b = 2;\n}", &captured));
        // Reordering that breaks contiguity counts as absent.
        assert!(!contains_snippet("let b = 2;\nlet a = 1;", &captured));
    }

    #[test]
    fn test_contains_snippet_absent_after_edit() {
        let captured = vec!["const LIMIT: u32 = 10;".to_string()];
        assert!(!contains_snippet("const LIMIT: u32 = 20;", &captured));
    }
}
