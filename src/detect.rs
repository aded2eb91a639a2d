//! Change detection rules for both monitor variants.
//!
//! A snippet entry has two states, active and retired, and moves to retired
//! the first time its fingerprint is no longer found. A commit entry is
//! never retired; its cursor advances past each batch of new commits.

use crate::github::CommitRecord;
use crate::snippet;

/// Whether a snippet entry's captured content is no longer present in the
/// current file text.
///
/// "Unchanged" means the normalized file contains the normalized snippet as
/// a contiguous substring; deletion, modification, and reordering that
/// breaks contiguity all read as "changed".
pub fn snippet_changed(captured_lines: &[String], current_file: &str) -> bool {
    !snippet::contains_snippet(current_file, captured_lines)
}

/// Commits that appeared since `last_seen`, i.e. the prefix of the
/// newest-first listing strictly before the stored cursor.
///
/// If the cursor is not within the fetched page, the whole page is returned:
/// anything older was truncated away by the page size, so the report is an
/// approximation, not a guaranteed complete diff. The caller advances the
/// cursor to the newest entry either way, which keeps re-polling idempotent
/// (never re-notifies the same commit) at the cost of gap-safety under
/// bursty upstream activity.
pub fn new_commits<'a>(newest_first: &'a [CommitRecord], last_seen: &str) -> &'a [CommitRecord] {
    let cut = newest_first
        .iter()
        .position(|c| c.sha == last_seen)
        .unwrap_or(newest_first.len());
    &newest_first[..cut]
}
