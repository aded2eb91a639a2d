//! Resource locator: pure parsing of operator-supplied reference URLs.
//!
//! Turns a browser-style GitHub URL into the parameters the fetcher needs:
//! a raw-content address plus line bounds for snippets, or owner/repo/branch
//! for commit monitoring. No side effects.

use crate::error::{Result, WatchError};
use regex::Regex;
use std::sync::LazyLock;

static LINE_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#L(\d+)-L(\d+)$").expect("static regex"));

static REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/\s]+)/([^/\s]+)(?:/tree/([^/\s]+))?$").expect("static regex")
});

/// Fetch parameters for a snippet reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetRef {
    /// Raw-content address of the referenced file.
    pub raw_url: String,
    /// Owner/namespace segment of the URL.
    pub origin: String,
    /// 1-based inclusive line bounds from the `#L<start>-L<end>` fragment.
    pub start: usize,
    pub end: usize,
}

/// Fetch parameters for a commit reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

/// Whether a reference URL carries a line-range fragment, i.e. names a
/// snippet rather than a repository branch.
pub fn is_snippet_url(url: &str) -> bool {
    LINE_RANGE_RE.is_match(url)
}

/// Parse a snippet reference of the form
/// `https://github.com/<owner>/<repo>/blob/<branch>/<path>#L<start>-L<end>`.
///
/// The raw-content address is derived by substituting the hosting domain
/// with its raw-content equivalent, dropping the `/blob/` path segment, and
/// stripping the fragment. `start <= end` is implied by valid use and not
/// enforced here.
pub fn parse_snippet_url(url: &str) -> Result<SnippetRef> {
    let caps = LINE_RANGE_RE
        .captures(url)
        .ok_or_else(|| WatchError::invalid_reference(url, "missing #L<start>-L<end> fragment"))?;

    let start: usize = caps[1]
        .parse()
        .map_err(|_| WatchError::invalid_reference(url, "line-range start is not a number"))?;
    let end: usize = caps[2]
        .parse()
        .map_err(|_| WatchError::invalid_reference(url, "line-range end is not a number"))?;

    let without_fragment = &url[..caps.get(0).expect("whole match").start()];

    let origin = without_fragment
        .split_once("github.com/")
        .map(|(_, rest)| rest.split('/').next().unwrap_or(""))
        .filter(|owner| !owner.is_empty())
        .ok_or_else(|| WatchError::invalid_reference(url, "not a github.com file URL"))?
        .to_string();

    if !without_fragment.contains("/blob/") {
        return Err(WatchError::invalid_reference(
            url,
            "missing /blob/ path segment",
        ));
    }

    let raw_url = without_fragment
        .replace("github.com", "raw.githubusercontent.com")
        .replacen("/blob/", "/", 1);

    Ok(SnippetRef {
        raw_url,
        origin,
        start,
        end,
    })
}

/// Parse a commit reference of the form
/// `<host>/<owner>/<repo>[/tree/<branch>]`, trailing slash tolerated.
/// The branch defaults to `main` when absent.
pub fn parse_repo_url(url: &str) -> Result<RepoRef> {
    let trimmed = url.trim_end_matches('/');
    let caps = REPO_RE
        .captures(trimmed)
        .ok_or_else(|| WatchError::invalid_reference(url, "expected <host>/<owner>/<repo>[/tree/<branch>]"))?;

    Ok(RepoRef {
        owner: caps[1].to_string(),
        repo: caps[2].to_string(),
        branch: caps
            .get(3)
            .map_or_else(|| "main".to_string(), |m| m.as_str().to_string()),
    })
}
