//! Entry lifecycle manager and poll-cycle orchestration.
//!
//! Owns the persistent collection of monitored entries: registration with
//! duplicate rejection, removal, and the sequential poll cycle. Per-entry
//! failures during a poll are logged and skipped; one entry never aborts the
//! batch. State is saved once per operation: add and remove persist on
//! success, a poll cycle persists after the whole iteration.

use crate::detect;
use crate::error::{Result, WatchError};
use crate::github::RemoteSource;
use crate::locator::{self, RepoRef};
use crate::model::{CommitEntry, MonitoredEntry, NotifyConfig, SnippetEntry};
use crate::notify::{self, Notifier};
use crate::snippet;
use crate::store::StatePort;

/// Counters for one poll cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    /// Entries inspected.
    pub checked: usize,
    /// Notifications rendered and delivered.
    pub notified: usize,
    /// Snippet entries removed after a delivered notification.
    pub retired: usize,
    /// Entries skipped because of a per-entry error.
    pub failed: usize,
}

/// What happened to a snippet entry during one poll.
enum SnippetOutcome {
    Unchanged,
    Retired,
}

/// Orchestrates add/remove/poll over the persistence port and the content
/// source. Operations that notify take the channel as an argument, so
/// registration and removal work without a webhook configured.
pub struct Monitor<'a, S, R>
where
    S: StatePort,
    R: RemoteSource,
{
    store: &'a S,
    source: &'a R,
}

impl<'a, S, R> Monitor<'a, S, R>
where
    S: StatePort,
    R: RemoteSource,
{
    pub fn new(store: &'a S, source: &'a R) -> Self {
        Self { store, source }
    }

    /// Register a new resource to monitor. The variant is chosen by the URL
    /// shape: a line-range fragment means snippet, otherwise a repository
    /// branch. Fails without mutating the collection if the URL is already
    /// present or the initial fetch/validation fails.
    pub fn add(&self, url: &str, note: Option<String>) -> Result<()> {
        let mut state = self.store.load()?;
        if state.contains_url(url) {
            return Err(WatchError::DuplicateEntry(url.to_string()));
        }

        let entry = if locator::is_snippet_url(url) {
            self.register_snippet(url, note)?
        } else {
            self.register_commit(url, note)?
        };

        tracing::info!("now monitoring {}", entry.url());
        state.entries.push(entry);
        self.store.save(&state)
    }

    /// Stop monitoring a URL.
    pub fn remove(&self, url: &str) -> Result<()> {
        let mut state = self.store.load()?;
        let before = state.entries.len();
        state.entries.retain(|e| e.url() != url);
        if state.entries.len() == before {
            return Err(WatchError::NotFound(url.to_string()));
        }
        self.store.save(&state)
    }

    /// Run one poll cycle over all entries, in collection order.
    ///
    /// A changed snippet is notified and then retired; a commit entry's
    /// cursor advances past the reported commits. The mutated collection is
    /// persisted once, after the iteration completes.
    pub fn poll_all<N: Notifier>(&self, notifier: &N) -> Result<PollReport> {
        let mut state = self.store.load()?;
        if state.entries.is_empty() {
            tracing::info!("nothing to poll");
            return Ok(PollReport::default());
        }

        let notify_config = state.notify.clone();
        let mut report = PollReport::default();
        let mut kept = Vec::with_capacity(state.entries.len());

        for entry in state.entries {
            report.checked += 1;
            match entry {
                MonitoredEntry::Snippet(entry) => {
                    match self.poll_snippet(&entry, &notify_config, notifier) {
                        Ok(SnippetOutcome::Unchanged) => {
                            tracing::debug!("unchanged: {}", entry.url);
                            kept.push(MonitoredEntry::Snippet(entry));
                        }
                        Ok(SnippetOutcome::Retired) => {
                            tracing::info!("snippet changed, notified and retired: {}", entry.url);
                            report.notified += 1;
                            report.retired += 1;
                        }
                        Err(e) => {
                            tracing::warn!("skipping {}: {e}", entry.url);
                            report.failed += 1;
                            kept.push(MonitoredEntry::Snippet(entry));
                        }
                    }
                }
                MonitoredEntry::Commit(mut entry) => {
                    match self.poll_commit(&mut entry, &notify_config, notifier) {
                        Ok(true) => {
                            tracing::info!(
                                "new commits on {}/{}@{}",
                                entry.owner,
                                entry.repo,
                                entry.branch
                            );
                            report.notified += 1;
                        }
                        Ok(false) => {
                            tracing::debug!("unchanged: {}", entry.url);
                        }
                        Err(e) => {
                            tracing::warn!("skipping {}: {e}", entry.url);
                            report.failed += 1;
                        }
                    }
                    kept.push(MonitoredEntry::Commit(entry));
                }
            }
        }

        state.entries = kept;
        self.store.save(&state)?;
        Ok(report)
    }

    /// Send a test message through the notification channel, using the
    /// persisted display settings.
    pub fn send_test<N: Notifier>(&self, notifier: &N) -> Result<()> {
        let state = self.store.load()?;
        notifier.deliver(notify::TEST_MESSAGE, &state.notify)
    }

    fn register_snippet(&self, url: &str, note: Option<String>) -> Result<MonitoredEntry> {
        let snippet_ref = locator::parse_snippet_url(url)?;
        let text = self.source.file_text(&snippet_ref.raw_url)?;
        let captured_lines = snippet::capture_lines(&text, snippet_ref.start, snippet_ref.end)?;

        Ok(MonitoredEntry::Snippet(SnippetEntry {
            url: url.to_string(),
            origin: snippet_ref.origin,
            note,
            captured_lines,
        }))
    }

    fn register_commit(&self, url: &str, note: Option<String>) -> Result<MonitoredEntry> {
        let repo = locator::parse_repo_url(url)?;
        let commits = self.source.recent_commits(&repo)?;
        let newest = commits.first().ok_or_else(|| WatchError::EmptyHistory {
            owner: repo.owner.clone(),
            repo: repo.repo.clone(),
            branch: repo.branch.clone(),
        })?;

        Ok(MonitoredEntry::Commit(CommitEntry {
            url: url.to_string(),
            owner: repo.owner.clone(),
            repo: repo.repo.clone(),
            branch: repo.branch.clone(),
            last_commit: newest.sha.clone(),
            note,
        }))
    }

    /// Check one snippet entry. Retirement is gated on a successfully
    /// rendered AND delivered notification: a changed-but-undelivered
    /// snippet stays in the collection and is re-detected next poll.
    fn poll_snippet<N: Notifier>(
        &self,
        entry: &SnippetEntry,
        notify_config: &NotifyConfig,
        notifier: &N,
    ) -> Result<SnippetOutcome> {
        let snippet_ref = locator::parse_snippet_url(&entry.url)?;
        let text = self.source.file_text(&snippet_ref.raw_url)?;

        if !detect::snippet_changed(&entry.captured_lines, &text) {
            return Ok(SnippetOutcome::Unchanged);
        }

        let message = notify::compose_snippet_message(entry, notify_config)?;
        notifier.deliver(&message, notify_config)?;
        Ok(SnippetOutcome::Retired)
    }

    /// Check one commit entry; returns whether new commits were reported.
    ///
    /// The cursor advances to the newest commit once the message renders.
    /// A delivery failure after that point is reported but does not roll the
    /// cursor back. A render failure leaves the cursor untouched so the
    /// commits are re-reported next poll.
    fn poll_commit<N: Notifier>(
        &self,
        entry: &mut CommitEntry,
        notify_config: &NotifyConfig,
        notifier: &N,
    ) -> Result<bool> {
        let repo = RepoRef {
            owner: entry.owner.clone(),
            repo: entry.repo.clone(),
            branch: entry.branch.clone(),
        };
        let commits = self.source.recent_commits(&repo)?;
        let fresh = detect::new_commits(&commits, &entry.last_commit);
        if fresh.is_empty() {
            return Ok(false);
        }

        let message = notify::compose_commit_message(entry, fresh, notify_config)?;
        entry.last_commit = fresh[0].sha.clone();
        notifier.deliver(&message, notify_config)?;
        Ok(true)
    }
}
