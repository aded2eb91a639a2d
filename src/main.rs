//! repowatch: one-shot change alerts for GitHub file snippets and branch
//! commits.

use anyhow::{Context, Result};
use clap::Parser;
use repowatch::{
    github::{GitHubClient, GitHubClientConfig},
    monitor::Monitor,
    notify::WebhookNotifier,
    store::JsonStateFile,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repowatch")]
#[command(version)]
#[command(about = "One-shot change alerts for GitHub file snippets and branch commits", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Watch a line range; the URL shape (the #L..-L.. fragment) selects the variant
    repowatch --add 'https://github.com/acme/widget/blob/main/src/lib.rs#L10-L20' \\
        --note 'exported API surface'

    # Watch a branch head
    repowatch --add https://github.com/acme/widget/tree/release-2.x

    # One poll cycle, delivering alerts to a webhook (run this from cron/CI)
    repowatch --webhook https://discord.com/api/webhooks/...

    # Verify webhook wiring
    repowatch --test --webhook https://discord.com/api/webhooks/...")]
struct Cli {
    /// Add a GitHub snippet or repository URL to monitor
    #[arg(long, value_name = "URL")]
    add: Option<String>,

    /// Note explaining what is being monitored (used with --add)
    #[arg(long, value_name = "TEXT", requires = "add")]
    note: Option<String>,

    /// Remove a URL from monitoring
    #[arg(long, value_name = "URL")]
    remove: Option<String>,

    /// Webhook URL for notifications; without --add/--remove/--test this
    /// runs one poll cycle
    #[arg(long, value_name = "URL")]
    webhook: Option<String>,

    /// Send a test message to the webhook and exit
    #[arg(long, requires = "webhook")]
    test: bool,

    /// Path to the state document
    #[arg(long, value_name = "PATH", default_value = "watch.json", env = "REPOWATCH_STATE")]
    state_file: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "30")]
    timeout: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let timeout = Duration::from_secs(cli.timeout);
    let store = JsonStateFile::new(&cli.state_file);
    let github = GitHubClient::new(GitHubClientConfig {
        timeout,
        ..GitHubClientConfig::default()
    })
    .context("failed to set up the GitHub client")?;
    let monitor = Monitor::new(&store, &github);

    if let Some(url) = &cli.add {
        monitor
            .add(url, cli.note.clone())
            .with_context(|| format!("failed to add {url}"))?;
        println!("Now monitoring {url}");
        if let Some(note) = &cli.note {
            println!("Note: {note}");
        }
    }

    if let Some(url) = &cli.remove {
        monitor
            .remove(url)
            .with_context(|| format!("failed to remove {url}"))?;
        println!("Stopped monitoring {url}");
    }

    if cli.test {
        let webhook = cli.webhook.as_deref().expect("clap enforces --webhook");
        let notifier = WebhookNotifier::new(webhook, timeout)?;
        monitor.send_test(&notifier).context("test message failed")?;
        println!("Test message delivered");
        return Ok(());
    }

    // With no add/remove/test, a webhook means "run one poll cycle".
    if cli.add.is_none() && cli.remove.is_none() {
        let webhook = cli
            .webhook
            .as_deref()
            .context("the --webhook flag is required when checking for changes")?;
        let notifier = WebhookNotifier::new(webhook, timeout)?;
        let report = monitor
            .poll_all(&notifier)
            .context("poll cycle could not run")?;
        println!(
            "Checked {} entr{}: {} notified, {} retired, {} failed",
            report.checked,
            if report.checked == 1 { "y" } else { "ies" },
            report.notified,
            report.retired,
            report.failed
        );
    }

    Ok(())
}
