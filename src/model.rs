//! Monitored entry collection and notification configuration.
//!
//! [`WatchFile`] is the whole persistence unit: every operation loads it,
//! mutates it, and writes it back in full. Entries are kept in insertion
//! order and keyed by their reference URL.

use serde::{Deserialize, Serialize};

/// One monitored resource. Identity is the operator-supplied reference URL,
/// which is unique across the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonitoredEntry {
    /// A fixed line range of a file on a branch.
    Snippet(SnippetEntry),
    /// The most recent commit of a repository branch.
    Commit(CommitEntry),
}

impl MonitoredEntry {
    /// The reference URL this entry was registered with.
    pub fn url(&self) -> &str {
        match self {
            Self::Snippet(s) => &s.url,
            Self::Commit(c) => &c.url,
        }
    }

    /// Top-level namespace the entry belongs to, for display and grouping.
    pub fn origin(&self) -> &str {
        match self {
            Self::Snippet(s) => &s.origin,
            Self::Commit(c) => &c.owner,
        }
    }
}

/// A watched file line range, fingerprinted by the lines captured at
/// registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetEntry {
    /// Reference URL with the `#L<start>-L<end>` fragment.
    pub url: String,
    /// Owner/namespace segment of the URL.
    pub origin: String,
    /// Optional operator note, passed through verbatim into notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Lines captured at registration time, exactly as fetched.
    pub captured_lines: Vec<String>,
}

/// A watched repository branch, fingerprinted by the last seen commit id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitEntry {
    /// Reference URL of the repository (optionally `/tree/<branch>`).
    pub url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// High-water mark: the newest commit id seen so far.
    pub last_commit: String,
    /// Optional operator note, passed through verbatim into notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Notification settings, passed by reference into the composer.
///
/// Empty strings mean "use the built-in default". The composer resolves the
/// fallback at render time, so a hand-edited state file only needs to set the
/// fields it wants to override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Message template for snippet changes.
    pub template_snippet: String,
    /// Message template for new commits.
    pub template_commit: String,
    /// Display name the webhook posts under.
    pub username: String,
    /// Avatar image address the webhook posts with.
    pub avatar_url: String,
}

/// The persisted state document: entry collection plus notification config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchFile {
    pub entries: Vec<MonitoredEntry>,
    pub notify: NotifyConfig,
}

impl WatchFile {
    /// Whether a reference URL is already registered.
    pub fn contains_url(&self, url: &str) -> bool {
        self.entries.iter().any(|e| e.url() == url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> WatchFile {
        WatchFile {
            entries: vec![
                MonitoredEntry::Snippet(SnippetEntry {
                    url: "https://github.com/acme/widget/blob/main/src/lib.rs#L3-L5".into(),
                    origin: "acme".into(),
                    note: Some("license header".into()),
                    captured_lines: vec!["fn one() {}".into(), "fn two() {}".into(), "".into()],
                }),
                MonitoredEntry::Commit(CommitEntry {
                    url: "https://github.com/acme/widget".into(),
                    owner: "acme".into(),
                    repo: "widget".into(),
                    branch: "main".into(),
                    last_commit: "abc123".into(),
                    note: None,
                }),
            ],
            notify: NotifyConfig::default(),
        }
    }

    #[test]
    fn test_entry_accessors() {
        let state = sample_state();
        assert_eq!(
            state.entries[0].url(),
            "https://github.com/acme/widget/blob/main/src/lib.rs#L3-L5"
        );
        assert_eq!(state.entries[0].origin(), "acme");
        assert_eq!(state.entries[1].origin(), "acme");
    }

    #[test]
    fn test_contains_url() {
        let state = sample_state();
        assert!(state.contains_url("https://github.com/acme/widget"));
        assert!(!state.contains_url("https://github.com/acme/other"));
    }

    #[test]
    fn test_serde_round_trip_is_tagged() {
        let state = sample_state();
        let json = serde_json::to_string_pretty(&state).unwrap();
        assert!(json.contains(r#""kind": "snippet""#));
        assert!(json.contains(r#""kind": "commit""#));

        let back: WatchFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries.len(), 2);
        assert_eq!(back.entries[1].url(), state.entries[1].url());
    }

    #[test]
    fn test_missing_fields_load_as_defaults() {
        let state: WatchFile = serde_json::from_str("{}").unwrap();
        assert!(state.entries.is_empty());
        assert_eq!(state.notify, NotifyConfig::default());

        // A note-less snippet entry round-trips without a "note" key.
        let json = serde_json::to_string(&MonitoredEntry::Snippet(SnippetEntry {
            url: "u".into(),
            origin: "o".into(),
            note: None,
            captured_lines: vec!["x".into()],
        }))
        .unwrap();
        assert!(!json.contains("note"));
    }
}
