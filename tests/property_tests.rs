//! Property-based tests for the tag grammar and feed paging.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Re-parsing the canonical form of a tag edit is idempotent
//! - Added and removed tag sets never overlap
//! - Applying an edit never duplicates tags
//! - `set_max_results` adds the parameter exactly once

#![allow(clippy::expect_used, clippy::unwrap_used)]

use feedcl::models::TagEdit;
use feedcl::services::{FeedAggregator, FeedSettings, parse_tag_edit, set_max_results};
use feedcl::{Entry, MemoryFeedSource};
use proptest::prelude::*;

/// Tag tokens: plain, removals, escaped literals, the clear marker, and empty.
fn tag_token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]{1,8}",
        "[a-z0-9]{1,8}".prop_map(|t| format!("-{t}")),
        "[a-z0-9]{1,8}".prop_map(|t| format!("\\-{t}")),
        Just("--".to_string()),
        Just(String::new()),
    ]
}

fn tag_string() -> impl Strategy<Value = String> {
    prop::collection::vec(tag_token(), 1..12).prop_map(|tokens| tokens.join(", "))
}

proptest! {
    /// Property: the canonical form re-parses to an equal edit.
    #[test]
    fn prop_canonical_form_is_idempotent(input in tag_string()) {
        let edit = parse_tag_edit(&input);
        let reparsed = parse_tag_edit(&edit.to_tag_string());
        prop_assert_eq!(reparsed, edit);
    }

    /// Property: edits made only of empty tags survive re-parsing.
    #[test]
    fn prop_empty_tags_round_trip(commas in 1usize..4) {
        let edit = parse_tag_edit(&",".repeat(commas));
        prop_assert!(edit.add.contains(""));
        prop_assert_eq!(parse_tag_edit(&edit.to_tag_string()), edit);
    }

    /// Property: no tag is both added and removed.
    #[test]
    fn prop_add_and_remove_are_disjoint(input in tag_string()) {
        let edit = parse_tag_edit(&input);
        prop_assert!(edit.add.is_disjoint(&edit.remove));
    }

    /// Property: applied edits contain every add, no remove, and no duplicates.
    #[test]
    fn prop_apply_result(
        input in tag_string(),
        existing in prop::collection::vec("[a-z0-9]{1,8}", 0..8),
    ) {
        let edit: TagEdit = parse_tag_edit(&input);
        let mut unique = existing.clone();
        unique.sort();
        unique.dedup();

        let applied = edit.apply(&unique);
        for tag in &edit.add {
            prop_assert!(applied.contains(tag));
        }
        for tag in &edit.remove {
            prop_assert!(!applied.contains(tag) || edit.add.contains(tag));
        }
        let mut deduped = applied.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), applied.len());
    }

    /// Property: `set_max_results` is idempotent and names the parameter once.
    #[test]
    fn prop_set_max_results_once(
        path in "[a-z]{1,10}(/[a-z]{1,10}){0,3}",
        query in prop::option::of("[a-z]{1,5}=[a-z0-9]{1,5}"),
        max in 1u32..100_000,
    ) {
        let uri = match query {
            Some(q) => format!("http://host/{path}?{q}"),
            None => format!("http://host/{path}"),
        };
        let once = set_max_results(&uri, max);
        let twice = set_max_results(&once, max + 1);

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.matches("max-results=").count(), 1);
        prop_assert_eq!(once.matches('?').count(), 1);
        let expected_suffix = format!("max-results={max}");
        prop_assert!(once.ends_with(&expected_suffix));
    }

    /// Property: uncapped aggregation returns every entry in page order.
    #[test]
    fn prop_uncapped_aggregation_concatenates(sizes in prop::collection::vec(0usize..5, 1..6)) {
        let mut next_id = 0usize;
        let pages: Vec<Vec<Entry>> = sizes
            .iter()
            .map(|&n| {
                (0..n)
                    .map(|_| {
                        next_id += 1;
                        Entry::new(next_id.to_string(), format!("t{next_id}"))
                    })
                    .collect()
            })
            .collect();
        let source = MemoryFeedSource::chained("mem://p", pages);
        let agg = FeedAggregator::new(&source, FeedSettings::default()).aggregate("mem://p");

        let ids: Vec<usize> = agg.entries.iter().map(|e| e.id.parse().unwrap()).collect();
        prop_assert_eq!(ids, (1..=next_id).collect::<Vec<_>>());
        prop_assert!(!agg.truncated);
        prop_assert_eq!(source.requests().len(), sizes.len());
    }
}
