//! Reference indexing for grouped message stacks
//!
//! A bot response arrives as a stack of layers. The stack carries the full
//! list of citations; each layer carries the subset it used. Indexing
//! collapses duplicate citations in the stack and points every layer at
//! positions in the collapsed list.

#[cfg(test)]
mod proptests;

use crate::broker::{KnowledgeItem, Payload, References};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// One layer of a grouped stack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub payload: Payload,
    /// Positions into the owning entry's `knowledge_items`
    #[serde(
        rename = "referenceIndexes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_indexes: Option<Vec<usize>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Layer {
    #[must_use]
    pub fn with_references(items: Vec<KnowledgeItem>) -> Self {
        Self {
            payload: Payload {
                references: Some(References::with_items(items)),
                extra: Map::new(),
            },
            ..Self::default()
        }
    }

    fn knowledge_items(&self) -> Option<&[KnowledgeItem]> {
        self.payload
            .references
            .as_ref()
            .and_then(|r| r.knowledge_items.as_deref())
    }
}

/// A group of layers sharing one citation list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedStackEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<References>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GroupedStackEntry {
    #[must_use]
    pub fn new(items: Vec<KnowledgeItem>, layers: Vec<Layer>) -> Self {
        Self {
            references: Some(References::with_items(items)),
            layers,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn knowledge_items(&self) -> Option<&[KnowledgeItem]> {
        self.references
            .as_ref()
            .and_then(|r| r.knowledge_items.as_deref())
    }
}

/// Deduplicate citations and build per-layer reference indexes, in place.
///
/// Entries without `references.knowledge_items` are left untouched. Layers
/// whose payload has no `knowledge_items` keep whatever `reference_indexes`
/// they had.
pub fn index_layer_refs(grouped_stack: &mut [GroupedStackEntry]) {
    for entry in grouped_stack.iter_mut() {
        let Some(items) = entry
            .references
            .as_mut()
            .and_then(|r| r.knowledge_items.as_mut())
        else {
            continue;
        };

        dedup_knowledge_items(items);

        let positions: HashMap<(Option<&str>, Option<&str>), usize> = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.key(), idx))
            .collect();

        for layer in &mut entry.layers {
            let Some(layer_items) = layer.knowledge_items() else {
                continue;
            };

            let mut seen = HashSet::new();
            let indexes: Vec<usize> = layer_items
                .iter()
                .filter_map(|item| positions.get(&item.key()).copied())
                .filter(|idx| seen.insert(*idx))
                .collect();
            layer.reference_indexes = Some(indexes);
        }
    }
}

/// Remove repeated `(url, title)` pairs, keeping the first occurrence
fn dedup_knowledge_items(items: &mut Vec<KnowledgeItem>) {
    let mut seen: HashSet<(Option<String>, Option<String>)> = HashSet::new();
    items.retain(|item| seen.insert((item.url.clone(), item.title.clone())));
}
