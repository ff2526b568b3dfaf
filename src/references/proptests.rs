//! Property-based tests for reference indexing
//!
//! Citations are drawn from a tiny alphabet so duplicates are common.

use super::*;
use proptest::prelude::*;

fn arb_item() -> impl Strategy<Value = KnowledgeItem> {
    (
        proptest::option::weighted(0.9, "[ab]"),
        proptest::option::weighted(0.9, "[XY]"),
    )
        .prop_map(|(url, title)| KnowledgeItem {
            title,
            url,
            extra: Map::new(),
        })
}

fn arb_layer() -> impl Strategy<Value = Layer> {
    proptest::option::of(proptest::collection::vec(arb_item(), 0..6)).prop_map(|items| match items {
        Some(items) => Layer::with_references(items),
        None => Layer::default(),
    })
}

fn arb_entry() -> impl Strategy<Value = GroupedStackEntry> {
    (
        proptest::option::weighted(0.85, proptest::collection::vec(arb_item(), 0..8)),
        proptest::collection::vec(arb_layer(), 0..4),
    )
        .prop_map(|(items, layers)| GroupedStackEntry {
            references: items.map(References::with_items),
            layers,
            extra: Map::new(),
        })
}

fn arb_stack() -> impl Strategy<Value = Vec<GroupedStackEntry>> {
    proptest::collection::vec(arb_entry(), 0..5)
}

proptest! {
    /// No two knowledge items share a (url, title) pair after indexing
    #[test]
    fn prop_knowledge_items_unique(mut stack in arb_stack()) {
        index_layer_refs(&mut stack);

        for entry in &stack {
            if let Some(items) = entry.knowledge_items() {
                let keys: HashSet<_> = items.iter().map(KnowledgeItem::key).collect();
                prop_assert_eq!(keys.len(), items.len());
            }
        }
    }

    /// Every reference index is unique and points into the entry's list
    #[test]
    fn prop_reference_indexes_valid(mut stack in arb_stack()) {
        index_layer_refs(&mut stack);

        for entry in &stack {
            let Some(items) = entry.knowledge_items() else { continue };
            for layer in &entry.layers {
                if layer.knowledge_items().is_none() {
                    prop_assert!(layer.reference_indexes.is_none());
                    continue;
                }
                let indexes = layer.reference_indexes.as_ref();
                prop_assert!(indexes.is_some());
                let indexes = indexes.unwrap();
                let unique: HashSet<_> = indexes.iter().collect();
                prop_assert_eq!(unique.len(), indexes.len());
                prop_assert!(indexes.iter().all(|&i| i < items.len()));
            }
        }
    }

    /// Each indexed item is one the layer actually cited, and every citation
    /// present in the entry is indexed
    #[test]
    fn prop_indexes_match_layer_citations(mut stack in arb_stack()) {
        index_layer_refs(&mut stack);

        for entry in &stack {
            let Some(items) = entry.knowledge_items() else { continue };
            for layer in &entry.layers {
                let (Some(cited), Some(indexes)) =
                    (layer.knowledge_items(), layer.reference_indexes.as_ref())
                else {
                    continue;
                };
                let cited_keys: HashSet<_> = cited.iter().map(KnowledgeItem::key).collect();
                for &i in indexes {
                    prop_assert!(cited_keys.contains(&items[i].key()));
                }
                let expected = items
                    .iter()
                    .filter(|item| cited_keys.contains(&item.key()))
                    .count();
                prop_assert_eq!(indexes.len(), expected);
            }
        }
    }

    /// Dedup keeps the first occurrence of each pair in original order
    #[test]
    fn prop_dedup_preserves_first_occurrence(entry in arb_entry()) {
        let original: Vec<KnowledgeItem> = entry
            .knowledge_items()
            .map(<[KnowledgeItem]>::to_vec)
            .unwrap_or_default();
        let mut stack = vec![entry];
        index_layer_refs(&mut stack);

        let mut seen = HashSet::new();
        let expected: Vec<_> = original
            .iter()
            .filter(|item| seen.insert(item.key()))
            .cloned()
            .collect();
        let actual = stack[0].knowledge_items().map(<[KnowledgeItem]>::to_vec).unwrap_or_default();
        prop_assert_eq!(actual, expected);
    }

    /// Indexing an already indexed stack changes nothing
    #[test]
    fn prop_indexing_is_idempotent(mut stack in arb_stack()) {
        index_layer_refs(&mut stack);
        let once = stack.clone();
        index_layer_refs(&mut stack);
        prop_assert_eq!(stack, once);
    }
}
