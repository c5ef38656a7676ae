//! The core data type shared across all feed sources.
//!
//! `Entry` represents a single item from any feed format (RSS 2.0, Atom).
//! Every source implementation converts its native format into `Entry`
//! values so the rest of the application can stay format-agnostic.
//!
//! All fields are optional: feeds in the wild omit any combination of them,
//! and defaulting is resolved once here at the conversion boundary so the
//! identity and reconciliation logic stay pure functions over a fully-typed
//! structure.

/// A single feed entry, normalised from any feed format.
///
/// Timestamps are kept as the raw strings the feed supplied. They are never
/// parsed: identity derivation (see [`crate::identity`]) composes them
/// verbatim, and the notification body prints them verbatim.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Entry {
    /// Durable identifier (Atom `<id>`). Preferred for de-duplication.
    pub id: Option<String>,
    /// RSS `<guid>` value.
    pub guid: Option<String>,
    /// Permalink to the full content.
    pub link: Option<String>,
    /// Human-readable headline.
    pub title: Option<String>,
    /// Publication timestamp, verbatim from the feed.
    pub published: Option<String>,
    /// Last-updated timestamp, verbatim from the feed.
    pub updated: Option<String>,
}

impl Entry {
    /// The timestamp to display and to compose into fallback identities:
    /// `published` when present, else `updated`, else empty.
    pub fn published_or_updated(&self) -> &str {
        self.published
            .as_deref()
            .or(self.updated.as_deref())
            .unwrap_or("")
    }
}
