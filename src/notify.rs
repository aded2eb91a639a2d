//! Notification composer and webhook delivery.
//!
//! Renders a templated message per detected change and hands it to the
//! webhook collaborator. Templates use named `{field}` placeholders with
//! `{{`/`}}` escaping a literal brace; the field set is fixed per variant.

use crate::error::{Result, WatchError};
use crate::github::CommitRecord;
use crate::model::{CommitEntry, NotifyConfig, SnippetEntry};
use serde::Serialize;
use std::time::Duration;

/// Built-in snippet template, used when the configured one is empty.
///
/// Fields: `{company}`, `{note}`, `{url}`, `{content}`.
pub const DEFAULT_SNIPPET_TEMPLATE: &str = "\u{1f6a8} **Watched snippet changed**

**Project**: {company}
**Note**: {note}
**Source**: {url}

**Captured content no longer present**:
```
{content}
```";

/// Built-in commit template, used when the configured one is empty.
///
/// Fields: `{owner}`, `{repo}`, `{branch}`, `{note}`, `{url}`, `{content}`.
pub const DEFAULT_COMMIT_TEMPLATE: &str = "\u{1f6a8} **New commits detected**

**Repository**: {owner}/{repo}
**Branch**: {branch}
**Note**: {note}
**Repository URL**: {url}

**New commits**:
{content}";

/// Display name used when the configured one is empty.
pub const DEFAULT_USERNAME: &str = "repowatch";

/// Avatar image address used when the configured one is empty.
pub const DEFAULT_AVATAR_URL: &str =
    "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png";

/// Message sent by `--test` to verify webhook wiring end to end.
pub const TEST_MESSAGE: &str = "\u{2705} **repowatch test message**

Webhook wiring is working. Change notifications will be delivered here.";

/// Render a template by substituting `{field}` placeholders from `fields`.
///
/// `{{` and `}}` produce literal braces. An unknown field, an unclosed
/// placeholder, or a stray `}` is a [`WatchError::Template`].
pub fn render(template: &str, fields: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(WatchError::Template(format!(
                                "unclosed placeholder '{{{name}'"
                            )))
                        }
                    }
                }
                let value = fields
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, v)| *v)
                    .ok_or_else(|| WatchError::Template(format!("unknown field '{name}'")))?;
                out.push_str(value);
            }
            '}' => return Err(WatchError::Template("unmatched '}'".to_string())),
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Render the message for a changed snippet entry.
pub fn compose_snippet_message(entry: &SnippetEntry, config: &NotifyConfig) -> Result<String> {
    let template = effective(&config.template_snippet, DEFAULT_SNIPPET_TEMPLATE);
    render(
        template,
        &[
            ("company", entry.origin.as_str()),
            ("note", entry.note.as_deref().unwrap_or("")),
            ("url", entry.url.as_str()),
            ("content", &entry.captured_lines.join("\n")),
        ],
    )
}

/// Render the message for a commit entry with freshly detected commits.
pub fn compose_commit_message(
    entry: &CommitEntry,
    fresh: &[CommitRecord],
    config: &NotifyConfig,
) -> Result<String> {
    let template = effective(&config.template_commit, DEFAULT_COMMIT_TEMPLATE);
    render(
        template,
        &[
            ("owner", entry.owner.as_str()),
            ("repo", entry.repo.as_str()),
            ("branch", entry.branch.as_str()),
            ("note", entry.note.as_deref().unwrap_or("")),
            ("url", entry.url.as_str()),
            ("content", &format_commits(fresh)),
        ],
    )
}

/// Multi-line summary of each new commit: short id, author, first message
/// line, display link. Blocks joined by blank lines.
fn format_commits(commits: &[CommitRecord]) -> String {
    commits
        .iter()
        .map(|c| {
            format!(
                "\u{2022} **{}** by {}\n  {}\n  [View Commit]({})",
                c.short_sha(),
                c.detail.author.name,
                c.summary(),
                c.html_url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn effective<'a>(configured: &'a str, default: &'a str) -> &'a str {
    if configured.is_empty() {
        default
    } else {
        configured
    }
}

// ============================================================================
// Delivery
// ============================================================================

/// Delivery channel for rendered messages.
pub trait Notifier {
    /// Deliver one rendered message. Success is acknowledged receipt; any
    /// other outcome is a [`WatchError::Delivery`].
    fn deliver(&self, message: &str, config: &NotifyConfig) -> Result<()>;
}

/// Webhook payload: rendered text plus display identity.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
    avatar_url: &'a str,
}

/// Posts rendered messages to an operator-supplied webhook address.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookNotifier {
    /// Create a notifier for the given webhook URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| WatchError::Delivery(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn deliver(&self, message: &str, config: &NotifyConfig) -> Result<()> {
        let payload = WebhookPayload {
            content: message,
            username: effective(&config.username, DEFAULT_USERNAME),
            avatar_url: effective(&config.avatar_url, DEFAULT_AVATAR_URL),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .map_err(|e| WatchError::Delivery(e.to_string()))?;

        // The webhook contract acknowledges with 200 or 204.
        match response.status().as_u16() {
            200 | 204 => Ok(()),
            status => Err(WatchError::Delivery(format!(
                "webhook returned status {status}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{CommitAuthor, CommitDetail};

    fn commit(sha: &str, author: &str, message: &str) -> CommitRecord {
        CommitRecord {
            sha: sha.to_string(),
            detail: CommitDetail {
                author: CommitAuthor {
                    name: author.to_string(),
                    date: chrono::Utc::now(),
                },
                message: message.to_string(),
            },
            html_url: format!("https://github.com/acme/widget/commit/{sha}"),
        }
    }

    #[test]
    fn test_render_substitutes_fields() {
        let out = render("{a} and {b}", &[("a", "one"), ("b", "two")]).unwrap();
        assert_eq!(out, "one and two");
    }

    #[test]
    fn test_render_escaped_braces() {
        let out = render("{{literal}} {x}", &[("x", "v")]).unwrap();
        assert_eq!(out, "{literal} v");
    }

    #[test]
    fn test_render_unknown_field() {
        let err = render("{missing}", &[("x", "v")]).unwrap_err();
        assert!(matches!(err, WatchError::Template(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_render_unclosed_placeholder() {
        assert!(matches!(
            render("{oops", &[]),
            Err(WatchError::Template(_))
        ));
        assert!(matches!(render("}", &[]), Err(WatchError::Template(_))));
    }

    #[test]
    fn test_snippet_default_template_produces_message() {
        let entry = SnippetEntry {
            url: "https://github.com/acme/widget/blob/main/lib.rs#L1-L2".into(),
            origin: "acme".into(),
            note: Some("keep an eye on this".into()),
            captured_lines: vec!["fn one() {}".into(), "fn two() {}".into()],
        };
        let message = compose_snippet_message(&entry, &NotifyConfig::default()).unwrap();
        assert!(!message.is_empty());
        assert!(message.contains("acme"));
        assert!(message.contains("keep an eye on this"));
        assert!(message.contains("fn one() {}\nfn two() {}"));
    }

    #[test]
    fn test_commit_message_formats_each_commit() {
        let entry = CommitEntry {
            url: "https://github.com/acme/widget".into(),
            owner: "acme".into(),
            repo: "widget".into(),
            branch: "main".into(),
            last_commit: "old".into(),
            note: None,
        };
        let fresh = vec![
            commit("4a7f0c2d9b8e", "Jo Dev", "Fix parser\n\nbody"),
            commit("1b2c3d4e5f60", "Sam Dev", "Add tests"),
        ];
        let message = compose_commit_message(&entry, &fresh, &NotifyConfig::default()).unwrap();
        assert!(message.contains("acme/widget"));
        assert!(message.contains("**4a7f0c2d** by Jo Dev"));
        assert!(message.contains("Fix parser"));
        assert!(!message.contains("body"), "only the first message line is shown");
        assert!(message.contains("[View Commit]("));
    }

    #[test]
    fn test_custom_template_overrides_default() {
        let entry = CommitEntry {
            url: "https://github.com/acme/widget".into(),
            owner: "acme".into(),
            repo: "widget".into(),
            branch: "main".into(),
            last_commit: "old".into(),
            note: None,
        };
        let config = NotifyConfig {
            template_commit: "{repo} moved".into(),
            ..NotifyConfig::default()
        };
        let message = compose_commit_message(&entry, &[], &config).unwrap();
        assert_eq!(message, "widget moved");
    }

    #[test]
    fn test_webhook_payload_shape() {
        let payload = WebhookPayload {
            content: "hello",
            username: DEFAULT_USERNAME,
            avatar_url: DEFAULT_AVATAR_URL,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["content"], "hello");
        assert_eq!(json["username"], "repowatch");
        assert!(json["avatar_url"].as_str().unwrap().starts_with("https://"));
    }
}
