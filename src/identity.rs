//! Stable identity derivation for feed entries.
//!
//! Feeds reorder freely between fetches, so positional comparison is
//! useless for "have I seen this before". Instead each entry is reduced to
//! a single identifier string, preferring the fields feeds keep stable
//! across reorderings.

use crate::source::Entry;

/// Derive the identifier used to track an entry across runs.
///
/// Fields are inspected in fixed priority order — `id`, then `guid`, then
/// `link` — and the first non-empty value (after trimming) wins outright.
/// Feed-native durable IDs beat mutable positional/timestamp data because
/// feeds frequently reorder without reissuing IDs, but simple sources may
/// omit IDs entirely.
///
/// When no durable field is present the fallback is
/// `"<title>::<published-or-updated>"`, both trimmed. Two ID-less entries
/// sharing a title and timestamp will collide; that false-dedup risk is a
/// known limitation of ID-less feeds.
pub fn uid_for(entry: &Entry) -> String {
    for field in [&entry.id, &entry.guid, &entry.link] {
        if let Some(value) = field {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    let title = entry.title.as_deref().unwrap_or("").trim();
    let stamp = entry.published_or_updated().trim();
    format!("{title}::{stamp}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        Entry::default()
    }

    #[test]
    fn id_wins_regardless_of_other_fields() {
        let a = Entry {
            id: Some("tag:example.com,2024:1".into()),
            title: Some("Original title".into()),
            published: Some("2024-01-01".into()),
            ..entry()
        };
        // Same id, different title/timestamp: identity must not change.
        let b = Entry {
            id: Some("tag:example.com,2024:1".into()),
            title: Some("Edited title".into()),
            published: Some("2024-06-30".into()),
            ..entry()
        };
        assert_eq!(uid_for(&a), uid_for(&b));
        assert_eq!(uid_for(&a), "tag:example.com,2024:1");
    }

    #[test]
    fn guid_beats_link() {
        let e = Entry {
            guid: Some("guid-7".into()),
            link: Some("https://example.com/7".into()),
            ..entry()
        };
        assert_eq!(uid_for(&e), "guid-7");
    }

    #[test]
    fn guid_is_trimmed() {
        let e = Entry {
            guid: Some("  guid-7\n".into()),
            ..entry()
        };
        assert_eq!(uid_for(&e), "guid-7");
    }

    #[test]
    fn whitespace_only_field_is_skipped() {
        let e = Entry {
            id: Some("   ".into()),
            link: Some("https://example.com/x".into()),
            ..entry()
        };
        assert_eq!(uid_for(&e), "https://example.com/x");
    }

    #[test]
    fn fallback_composes_title_and_published() {
        let e = Entry {
            title: Some("Widget".into()),
            published: Some("2024-01-01".into()),
            ..entry()
        };
        assert_eq!(uid_for(&e), "Widget::2024-01-01");
    }

    #[test]
    fn fallback_uses_updated_when_published_missing() {
        let e = Entry {
            title: Some("Widget".into()),
            updated: Some("2024-03-03".into()),
            ..entry()
        };
        assert_eq!(uid_for(&e), "Widget::2024-03-03");
    }

    #[test]
    fn fully_empty_entry_degrades_to_bare_separator() {
        assert_eq!(uid_for(&entry()), "::");
    }
}
