//! Paging and de-duplication properties.

use std::collections::HashSet;

use proptest::prelude::*;
use hunch::query::{dedup_chunks, page_count, PageInfo};
use hunch::SearchHit;

fn hit(id: String, score: f64) -> SearchHit {
    SearchHit {
        id,
        score,
        terms: Vec::new(),
        matches: Default::default(),
        stored: Default::default(),
    }
}

/// Ranked hits over a handful of files, each with a few chunks.
fn hits_strategy() -> impl Strategy<Value = Vec<SearchHit>> {
    prop::collection::vec((0usize..6, 0usize..4), 0..30).prop_map(|ids| {
        let unique: indexmap::IndexSet<(usize, usize)> = ids.into_iter().collect();
        let count = unique.len();
        unique
            .into_iter()
            .enumerate()
            .map(|(rank, (file, chunk))| hit(format!("{}:{}", file, chunk), (count - rank) as f64))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Property: de-duplication keeps exactly one hit per parent, the
    /// highest-ranked one, in rank order.
    #[test]
    fn prop_dedup_keeps_first_per_parent(hits in hits_strategy()) {
        let parents: HashSet<String> = hits
            .iter()
            .map(|h| hunch::bundle::parent_id(&h.id).to_string())
            .collect();
        let deduped = dedup_chunks(hits.clone());

        prop_assert_eq!(deduped.len(), parents.len());
        for kept in &deduped {
            let parent = hunch::bundle::parent_id(&kept.id);
            let first = hits
                .iter()
                .find(|h| hunch::bundle::parent_id(&h.id) == parent)
                .unwrap();
            prop_assert_eq!(&first.id, &kept.id);
        }
        prop_assert!(deduped.windows(2).all(|w| w[0].score >= w[1].score));
    }

    /// Property: the page count never undercounts, and overshoots by at
    /// most one page.
    #[test]
    fn prop_page_count_covers_every_item(total in 0usize..500, size in 1usize..50) {
        let pages = page_count(total, size);
        let exact = total.div_ceil(size);
        prop_assert!(pages >= exact);
        prop_assert!(pages <= exact + 1);
    }

    /// Property: page windows, clamped to the result set, partition it.
    #[test]
    fn prop_windows_partition_results(total in 0usize..200, size in 1usize..25) {
        let mut seen = 0;
        let mut offset = 0;
        loop {
            let window = PageInfo::new(total, size, offset).window();
            if window.start >= total {
                break;
            }
            prop_assert_eq!(window.start, seen);
            prop_assert_eq!(window.len(), size);
            seen = window.end.min(total);
            offset += 1;
        }
        prop_assert_eq!(seen, total);
    }
}
