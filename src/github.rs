//! GitHub content fetcher.
//!
//! Thin HTTP layer over the raw-content host and the commits listing API.
//! Failures are surfaced, never retried; the poll cycle treats them as
//! per-entry errors and moves on.

use crate::error::{Result, WatchError};
use crate::locator::RepoRef;
use serde::Deserialize;
use std::time::Duration;

/// GitHub client configuration.
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// Base URL for the REST API.
    pub api_base: String,
    /// Request timeout applied to every fetch.
    pub timeout: Duration,
    /// Number of commits requested per listing. Commits beyond this page are
    /// never inspected; see the cursor-walk notes in [`crate::detect`].
    pub per_page: usize,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            timeout: Duration::from_secs(30),
            per_page: 10,
        }
    }
}

/// Source of current resource state, fronting the HTTP collaborator so the
/// lifecycle manager can be exercised without a network.
pub trait RemoteSource {
    /// Fetch the full text of a raw-content address.
    fn file_text(&self, raw_url: &str) -> Result<String>;

    /// List the most recent commits on a branch, newest first.
    fn recent_commits(&self, repo: &RepoRef) -> Result<Vec<CommitRecord>>;
}

/// A commit as returned by the commits listing API.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    #[serde(rename = "commit")]
    pub detail: CommitDetail,
    /// Display link to the commit on the hosting platform.
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub author: CommitAuthor,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub date: chrono::DateTime<chrono::Utc>,
}

impl CommitRecord {
    /// Abbreviated commit id for display.
    pub fn short_sha(&self) -> &str {
        self.sha.get(..8).unwrap_or(&self.sha)
    }

    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.detail.message.lines().next().unwrap_or("")
    }
}

/// HTTP client for GitHub content.
pub struct GitHubClient {
    client: reqwest::blocking::Client,
    config: GitHubClientConfig,
}

/// Helper to convert reqwest errors to fetch errors.
fn network_error(context: &str, err: &reqwest::Error) -> WatchError {
    WatchError::fetch(context, err.to_string())
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(config: GitHubClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("failed to create HTTP client", &e))?;

        Ok(Self { client, config })
    }
}

impl RemoteSource for GitHubClient {
    fn file_text(&self, raw_url: &str) -> Result<String> {
        let response = self
            .client
            .get(raw_url)
            .send()
            .map_err(|e| network_error(raw_url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::fetch(
                raw_url,
                format!("status {}", status.as_u16()),
            ));
        }

        response.text().map_err(|e| network_error(raw_url, &e))
    }

    fn recent_commits(&self, repo: &RepoRef) -> Result<Vec<CommitRecord>> {
        let url = format!(
            "{}/repos/{}/{}/commits?sha={}&per_page={}",
            self.config.api_base, repo.owner, repo.repo, repo.branch, self.config.per_page
        );

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| network_error(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::fetch(
                &url,
                format!("status {}", status.as_u16()),
            ));
        }

        response
            .json()
            .map_err(|e| WatchError::fetch(&url, format!("malformed commit listing: {e}")))
    }
}
