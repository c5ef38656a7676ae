//! New-entry detection against stored identifier history.
//!
//! Given the entries a feed currently serves and the identifiers this feed
//! has produced before, compute which entries are genuinely new and what
//! the history should look like afterwards. This is a pure function: fetch
//! failures, bootstrapping, and persistence are the orchestrator's concern.

use std::collections::HashSet;

use crate::identity::uid_for;
use crate::source::Entry;

/// A newly discovered entry, resolved to the fields the notification needs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewItem {
    /// Derived identifier (see [`crate::identity`]).
    pub uid: String,
    /// Entry title, defaulted when the feed omitted one.
    pub title: String,
    /// Permalink, empty when the feed omitted one.
    pub link: String,
    /// Published-or-updated timestamp, verbatim, possibly empty.
    pub published: String,
    /// The feed this entry came from.
    pub feed_url: String,
}

impl NewItem {
    fn from_entry(entry: &Entry, uid: String, feed_url: &str) -> Self {
        Self {
            uid,
            title: entry.title.clone().unwrap_or_else(|| "(no title)".into()),
            link: entry.link.clone().unwrap_or_default(),
            published: entry.published_or_updated().to_string(),
            feed_url: feed_url.to_string(),
        }
    }
}

/// Diff `entries` against `history`, returning the new items in feed order
/// and the updated history.
///
/// The history is append-order (oldest first) and is truncated to its last
/// `max_uids` elements. An entry listed twice in the same fetch is reported
/// once. Eviction assumes entries arrive in roughly chronological order; a
/// feed that reorders wildly past the eviction window can resurface old
/// items as new, an accepted cost of keeping the history bounded.
pub fn reconcile(
    feed_url: &str,
    entries: &[Entry],
    history: &[String],
    max_uids: usize,
) -> (Vec<NewItem>, Vec<String>) {
    let mut seen: HashSet<String> = history.iter().cloned().collect();
    let mut updated: Vec<String> = history.to_vec();
    let mut new_items = Vec::new();

    for entry in entries {
        let uid = uid_for(entry);
        // `insert` returning false means the uid was already present,
        // either from stored history or earlier in this same fetch.
        if !seen.insert(uid.clone()) {
            continue;
        }
        new_items.push(NewItem::from_entry(entry, uid.clone(), feed_url));
        updated.push(uid);
    }

    if updated.len() > max_uids {
        updated.drain(..updated.len() - max_uids);
    }

    (new_items, updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry_with_id(id: &str) -> Entry {
        Entry {
            id: Some(id.into()),
            title: Some(format!("Title of {id}")),
            link: Some(format!("https://example.com/{id}")),
            ..Entry::default()
        }
    }

    const FEED: &str = "https://example.com/feed.xml";

    #[test]
    fn already_seen_entries_are_not_re_reported() {
        let history = vec!["u1".to_string()];
        let entries = vec![entry_with_id("u1"), entry_with_id("u2")];

        let (new_items, updated) = reconcile(FEED, &entries, &history, 1000);

        assert_eq!(new_items.len(), 1);
        assert_eq!(new_items[0].uid, "u2");
        assert_eq!(new_items[0].feed_url, FEED);
        assert_eq!(updated, vec!["u1".to_string(), "u2".to_string()]);
    }

    #[test]
    fn history_is_truncated_oldest_first() {
        let history = vec!["u1".to_string(), "u2".to_string()];
        let entries = vec![entry_with_id("u3"), entry_with_id("u4")];

        let (new_items, updated) = reconcile(FEED, &entries, &history, 2);

        assert_eq!(new_items.len(), 2);
        assert_eq!(updated, vec!["u3".to_string(), "u4".to_string()]);
    }

    #[test]
    fn duplicate_entry_within_one_fetch_reported_once() {
        let entries = vec![entry_with_id("u1"), entry_with_id("u1")];

        let (new_items, updated) = reconcile(FEED, &entries, &[], 1000);

        assert_eq!(new_items.len(), 1);
        assert_eq!(updated, vec!["u1".to_string()]);
    }

    #[test]
    fn empty_fetch_leaves_history_unchanged() {
        let history = vec!["u1".to_string(), "u2".to_string()];

        let (new_items, updated) = reconcile(FEED, &[], &history, 1000);

        assert!(new_items.is_empty());
        assert_eq!(updated, history);
    }

    #[test]
    fn empty_history_reports_everything() {
        let entries = vec![entry_with_id("u1"), entry_with_id("u2")];

        let (new_items, updated) = reconcile(FEED, &entries, &[], 1000);

        assert_eq!(new_items.len(), 2);
        assert_eq!(updated, vec!["u1".to_string(), "u2".to_string()]);
    }

    #[test]
    fn new_items_preserve_feed_order() {
        let entries = vec![
            entry_with_id("u3"),
            entry_with_id("u1"),
            entry_with_id("u2"),
        ];

        let (new_items, _) = reconcile(FEED, &entries, &[], 1000);

        let uids: Vec<&str> = new_items.iter().map(|i| i.uid.as_str()).collect();
        assert_eq!(uids, vec!["u3", "u1", "u2"]);
    }

    #[test]
    fn missing_title_and_link_are_defaulted() {
        let entries = vec![Entry {
            guid: Some("g1".into()),
            ..Entry::default()
        }];

        let (new_items, _) = reconcile(FEED, &entries, &[], 1000);

        assert_eq!(new_items[0].title, "(no title)");
        assert_eq!(new_items[0].link, "");
        assert_eq!(new_items[0].published, "");
    }

    #[test]
    fn truncation_applies_even_without_prior_history() {
        let entries: Vec<Entry> = (1..=5).map(|n| entry_with_id(&format!("u{n}"))).collect();

        let (new_items, updated) = reconcile(FEED, &entries, &[], 3);

        // All five are new, but only the last three identifiers are kept.
        assert_eq!(new_items.len(), 5);
        assert_eq!(
            updated,
            vec!["u3".to_string(), "u4".to_string(), "u5".to_string()]
        );
    }
}
