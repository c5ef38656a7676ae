//! One complete watch run.
//!
//! The orchestrator owns the in-memory state for the duration of the run:
//! load once, reconcile (or bootstrap) each feed in configured order,
//! persist exactly once after every feed has been attempted, then notify
//! if anything new turned up.
//!
//! Failure policy is deliberately fail-fast: a fetch or parse error on any
//! feed aborts the whole run before persistence, and the external
//! scheduler supplies retry-by-reinvocation. A notification failure, by
//! contrast, surfaces only after persistence: already-recorded identifiers
//! are not rolled back, so a flaky SMTP server cannot cause duplicate
//! alerts on the next run.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::identity::uid_for;
use crate::notify::{build_email, Notifier};
use crate::reconcile::{reconcile, NewItem};
use crate::source::FeedSource;
use crate::state;

/// Summary of what one run did, for logging and tests.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Feeds processed, bootstraps included.
    pub feeds_processed: usize,
    /// Feeds seen for the first time and primed without alerting.
    pub bootstrapped: usize,
    /// Every new item discovered, in feed-processing order then
    /// within-feed discovery order.
    pub new_items: Vec<NewItem>,
    /// Whether a notification was actually sent.
    pub notified: bool,
}

/// Execute one run over the given sources.
pub fn run(
    config: &Config,
    sources: &[Box<dyn FeedSource>],
    notifier: &dyn Notifier,
) -> Result<RunReport> {
    let mut seen = state::load(&config.state_file)
        .with_context(|| format!("failed to load state from {}", config.state_file.display()))?;

    let mut report = RunReport::default();

    for source in sources {
        let url = source.url();

        // First encounter: learn the feed's current entries without
        // alerting on them, then treat it as tracked from the next run on.
        if config.bootstrap_on_empty_state && !seen.contains_key(url) {
            let entries = source.fetch(config.max_items_per_feed)?;
            let mut uids: Vec<String> = entries.iter().map(uid_for).collect();
            if uids.len() > config.max_uids_per_feed {
                uids.drain(..uids.len() - config.max_uids_per_feed);
            }
            info!(feed = url, entries = uids.len(), "bootstrapped feed");
            seen.insert(url.to_string(), uids);
            report.feeds_processed += 1;
            report.bootstrapped += 1;
            continue;
        }

        let history = seen.get(url).cloned().unwrap_or_default();
        let entries = source.fetch(config.max_items_per_feed)?;
        let (new_items, updated) =
            reconcile(url, &entries, &history, config.max_uids_per_feed);
        debug!(feed = url, new = new_items.len(), "reconciled feed");

        seen.insert(url.to_string(), updated);
        report.new_items.extend(new_items);
        report.feeds_processed += 1;
    }

    state::save(&config.state_file, &seen)
        .with_context(|| format!("failed to save state to {}", config.state_file.display()))?;

    if report.new_items.is_empty() {
        info!("no new items");
    } else {
        let (subject, body) = build_email(&report.new_items);
        notifier.notify(&subject, &body)?;
        info!(count = report.new_items.len(), "emailed new items");
        report.notified = true;
    }

    Ok(report)
}
