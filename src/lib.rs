//! **One-shot change alerts for GitHub-hosted resources.**
//!
//! `repowatch` watches external, third-party-controlled text resources,
//! either a fixed line range of a file ("snippet") or the head of a
//! repository branch ("commit"), and posts a webhook notification the first
//! time a watched resource is observed to have changed. A snippet entry is
//! retired after its notification; a commit entry keeps watching with an
//! advanced cursor. One process invocation performs one operation (add,
//! remove, or a single poll cycle); the periodic schedule lives outside, in
//! cron or CI.
//!
//! ## Core Concepts & Modules
//!
//! - **[`locator`]**: pure parsing of operator-supplied reference URLs into
//!   fetch parameters.
//! - **[`github`]**: the HTTP collaborator (raw file content and commit
//!   listings), behind the [`RemoteSource`] trait.
//! - **[`snippet`]**: fingerprinting and the normalization applied to both
//!   sides of every comparison.
//! - **[`detect`]**: the change rules: substring containment for snippets,
//!   a cursor walk over the newest-first commit listing.
//! - **[`monitor`]**: the entry lifecycle: registration, removal, and the
//!   sequential poll cycle with per-entry error containment.
//! - **[`notify`]**: template rendering and webhook delivery.
//! - **[`store`]**: the persistence port; state is a single JSON document
//!   read and written whole.
//!
//! ## Detection semantics
//!
//! Snippet comparison is loose on purpose: line endings are unified and
//! every line is trimmed before comparing, and "unchanged" means the
//! normalized file still *contains* the normalized snippet anywhere, not
//! that it sits at the original position. Two documented consequences:
//! formatting-only edits go unreported, and a snippet duplicated elsewhere
//! in the file masks an edit to the original occurrence. Commit detection
//! reports everything newer than the stored cursor within one listing page,
//! then jumps the cursor to the newest commit.

#![warn(clippy::unwrap_used)]

pub mod detect;
pub mod error;
pub mod github;
pub mod locator;
pub mod model;
pub mod monitor;
pub mod notify;
pub mod snippet;
pub mod store;

// Re-export main types for convenience
pub use error::{Result, WatchError};
pub use github::{CommitRecord, GitHubClient, GitHubClientConfig, RemoteSource};
pub use locator::{RepoRef, SnippetRef};
pub use model::{CommitEntry, MonitoredEntry, NotifyConfig, SnippetEntry, WatchFile};
pub use monitor::{Monitor, PollReport};
pub use notify::{Notifier, WebhookNotifier};
pub use store::{JsonStateFile, StatePort};
