//! feedwatch — polls RSS/Atom feeds and emails newly discovered entries.
//!
//! Designed to be invoked periodically by an external scheduler (cron, a
//! CI workflow): each run is a single pass over the configured feeds, with
//! the only memory between runs being a small JSON state file of
//! already-seen entry identifiers.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  Vec<Entry>  ┌───────────┐  NewItems  ┌──────────┐
//! │ source/  │ ───────────► │  run.rs   │ ─────────► │ notify   │
//! │ (fetch)  │              │ (orchestr)│            │ (SMTP)   │
//! └──────────┘              └───────────┘            └──────────┘
//!                             ▲       │
//!                     load()  │       │  save()
//!                           ┌───────────┐
//!                           │ state.rs  │
//!                           └───────────┘
//! ```
//!
//! * **`source/`** — the `FeedSource` trait and the HTTP RSS/Atom
//!   implementation.
//! * **`identity`** — derives a stable identifier per entry.
//! * **`state`** — loads/saves the per-feed seen-identifier history.
//! * **`reconcile`** — diffs current entries against stored history.
//! * **`notify`** — formats the summary email and delivers it over SMTP.
//! * **`run`** — sequences one complete run.
//! * **`config`** — reads all settings from the environment, once.
//! * **`main`** — wires everything together and maps outcomes to exit
//!   codes: 0 on success, 2 when no feeds are configured, 1 on any
//!   fetch/state/mail fault.

mod config;
mod identity;
mod notify;
mod reconcile;
mod run;
mod source;
mod state;

use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use config::Config;
use notify::SmtpNotifier;
use run::RunReport;
use source::{shared_client, FeedSource, HttpFeedSource};

/// Exit code for "nothing to do": no feeds resolvable from any source.
const EXIT_NO_FEEDS: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    if config.feeds.is_empty() {
        eprintln!("ERROR: add feed URLs via the FEED_URLS environment variable.");
        return ExitCode::from(EXIT_NO_FEEDS);
    }

    match watch(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Build the real collaborators (HTTP sources, SMTP notifier) and execute
/// one run.
fn watch(config: &Config) -> Result<RunReport> {
    let client = shared_client()?;
    let sources: Vec<Box<dyn FeedSource>> = config
        .feeds
        .iter()
        .map(|url| Box::new(HttpFeedSource::new(url, client.clone())) as Box<dyn FeedSource>)
        .collect();
    let notifier = SmtpNotifier::new(config.smtp.clone());

    run::run(config, &sources, &notifier)
}
