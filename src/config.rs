//! Runtime configuration.
//!
//! Everything is read from the environment exactly once, at startup, into
//! an immutable [`Config`] that gets passed explicitly to the orchestrator
//! and the mail transport. Nothing else in the crate touches `std::env`,
//! which keeps the core testable without environment manipulation.

use std::env;
use std::path::PathBuf;

/// Built-in fallback feed list, used when `FEED_URLS` is unset or empty.
/// Prefer `FEED_URLS` in production.
const FEEDS: &[&str] = &[
    // "https://example.com/collections/all.atom",
];

const DEFAULT_STATE_FILE: &str = "seen_feed_items.json";
const DEFAULT_MAX_ITEMS_PER_FEED: usize = 40;
const DEFAULT_MAX_UIDS_PER_FEED: usize = 1000;

/// Immutable settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Feed URLs to poll, in processing order. Empty means nothing to do
    /// (a configuration error, reported distinctly by `main`).
    pub feeds: Vec<String>,
    /// Path of the JSON seen-identifier state file.
    pub state_file: PathBuf,
    /// Per-feed cap on entries consumed from a single fetch.
    pub max_items_per_feed: usize,
    /// Per-feed cap on retained identifier history.
    pub max_uids_per_feed: usize,
    /// First-encounter policy: learn a new feed's current entries without
    /// alerting on them.
    pub bootstrap_on_empty_state: bool,
    /// SMTP transport parameters.
    pub smtp: SmtpConfig,
}

/// Mail transport settings. Validated lazily: a run that finds nothing new
/// never needs them.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address; defaults to the username.
    pub from: String,
    /// Recipient addresses, blanks already dropped.
    pub to: Vec<String>,
}

impl Config {
    /// Read the full configuration from the process environment.
    pub fn from_env() -> Self {
        let username = env_or_default("SMTP_USERNAME", "");
        let from = {
            let explicit = env_or_default("EMAIL_FROM", "");
            if explicit.is_empty() {
                username.clone()
            } else {
                explicit
            }
        };

        let mut feeds = parse_list(&env_or_default("FEED_URLS", ""));
        if feeds.is_empty() {
            feeds = FEEDS.iter().map(|s| s.to_string()).collect();
        }

        Self {
            feeds,
            state_file: PathBuf::from(env_or_default("STATE_FILE", DEFAULT_STATE_FILE)),
            max_items_per_feed: parse_count(
                &env_or_default("MAX_ITEMS_PER_FEED", ""),
                DEFAULT_MAX_ITEMS_PER_FEED,
            ),
            max_uids_per_feed: parse_count(
                &env_or_default("MAX_UIDS_PER_FEED", ""),
                DEFAULT_MAX_UIDS_PER_FEED,
            ),
            bootstrap_on_empty_state: parse_bool(&env_or_default(
                "BOOTSTRAP_ON_EMPTY_STATE",
                "true",
            )),
            smtp: SmtpConfig {
                host: env_or_default("SMTP_HOST", "smtp.gmail.com"),
                port: parse_port(&env_or_default("SMTP_PORT", ""), 465),
                username,
                password: env_or_default("SMTP_PASSWORD", ""),
                from,
                to: parse_list(&env_or_default("EMAIL_TO", "")),
            },
        }
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated value, trimming each element and dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a non-negative integer, falling back to `default` on anything
/// unparseable. Empty or garbage values degrade rather than abort.
fn parse_count(raw: &str, default: usize) -> usize {
    raw.trim().parse().unwrap_or(default)
}

/// Parse a TCP port, falling back to `default` when the value is
/// unparseable or outside the `u16` range.
fn parse_port(raw: &str, default: u16) -> u16 {
    raw.trim().parse().unwrap_or(default)
}

/// Case-insensitive `"true"`; anything else, including an empty value, is
/// false. The default for an unset variable is supplied at the call site.
fn parse_bool(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}
