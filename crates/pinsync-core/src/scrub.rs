//! Suggested-tag filtering.
//!
//! Pinboard's recommendations carry tags injected by cross-posting services
//! and a couple of stale ones tied to a single prolific account. `scrub`
//! removes both kinds so they never reach the tag editor.

use std::collections::BTreeSet;

/// Tags that are dropped unconditionally.
pub const DENYLIST: &[&str] = &[
    "ifttt",
    "IFTTT",
    "twitter",
    "twitterlink",
    "tweet",
    "from:twitter",
    "from:ifttt",
    "via:packrati.us",
    "via:popular",
    "via:pinboard",
    "feedly",
    "pocket",
    "instapaper",
    "no_tag",
];

/// When this tag is suggested, [`LEGACY_TAGS`] come along with it.
pub const MARKER_TAG: &str = "@codepo8";

/// Dropped only in the presence of [`MARKER_TAG`].
pub const LEGACY_TAGS: [&str; 2] = ["1960s", "objective-c"];

/// Filters a suggested-tag list.
///
/// Duplicates are removed. The result is sorted, but callers should treat
/// it as unordered.
pub fn scrub<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set: BTreeSet<String> = tags
        .into_iter()
        .map(|tag| tag.as_ref().to_string())
        .collect();

    if set.contains(MARKER_TAG) {
        for legacy in LEGACY_TAGS {
            set.remove(legacy);
        }
    }
    for denied in DENYLIST {
        set.remove(*denied);
    }

    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_drops_denylist_and_legacy_with_marker() {
        let out = scrub(["ifttt", "design", "@codepo8", "1960s"]);

        assert!(out.contains(&"design".to_string()));
        assert!(out.contains(&"@codepo8".to_string()));
        assert!(!out.contains(&"ifttt".to_string()));
        assert!(!out.contains(&"1960s".to_string()));
    }

    #[test]
    fn test_scrub_keeps_legacy_without_marker() {
        let out = scrub(["1960s", "objective-c", "history"]);
        assert_eq!(out, vec!["1960s", "history", "objective-c"]);
    }

    #[test]
    fn test_scrub_removes_both_legacy_tags_with_marker() {
        let out = scrub(["objective-c", "1960s", "@codepo8", "ios"]);
        assert_eq!(out, vec!["@codepo8", "ios"]);
    }

    #[test]
    fn test_scrub_removes_duplicates() {
        let out = scrub(["rust", "rust", "async"]);
        assert_eq!(out, vec!["async", "rust"]);
    }

    #[test]
    fn test_scrub_never_emits_denylisted_tags() {
        let mut input: Vec<&str> = DENYLIST.to_vec();
        input.push("keep");
        let out = scrub(&input);
        assert_eq!(out, vec!["keep"]);
    }

    #[test]
    fn test_scrub_is_idempotent() {
        let cases: Vec<Vec<&str>> = vec![
            vec![],
            vec!["a", "b", "a"],
            vec!["@codepo8", "1960s", "objective-c", "ifttt"],
            vec!["1960s", "objective-c"],
            vec!["via:popular", "tweet", "web", "design"],
        ];
        for case in cases {
            let once = scrub(&case);
            let twice = scrub(&once);
            assert_eq!(once, twice, "scrub not idempotent for {:?}", case);
        }
    }

    #[test]
    fn test_scrub_empty() {
        assert!(scrub(Vec::<String>::new()).is_empty());
    }
}
