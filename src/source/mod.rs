//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait and the common [`Entry`]
//! type. The concrete HTTP implementation lives in [`http`]; the
//! orchestrator only ever sees the trait, so tests can drive a full run
//! with canned entries and no network.

mod entry;
mod http;

pub use entry::Entry;
pub use http::{shared_client, HttpFeedSource};

use anyhow::Result;

/// Trait that every feed source must implement.
///
/// The orchestrator keys persisted state by [`url()`](FeedSource::url), so
/// the value must be stable across runs for the same logical feed.
pub trait FeedSource {
    /// The feed URL; doubles as the state-store key.
    fn url(&self) -> &str;

    /// Fetch the feed's current entries, in feed-native order, capped to at
    /// most `max_items`. Entries beyond the cap are invisible downstream.
    ///
    /// A fetch or parse failure is fatal to the whole run; implementations
    /// should not swallow errors.
    fn fetch(&self, max_items: usize) -> Result<Vec<Entry>>;
}
