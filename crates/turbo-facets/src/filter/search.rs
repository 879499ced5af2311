//! Output of the external relevance scorer.

use crate::ids::ProductId;
use std::collections::HashMap;

/// Relevance-ordered product ids returned by the search backend for the
/// current `search` text. The scorer itself is opaque to this crate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    ranked: Vec<ProductId>,
    positions: HashMap<ProductId, usize>,
}

impl SearchHits {
    /// Build from ranked ids; duplicates keep their best rank.
    pub fn new(ranked: impl IntoIterator<Item = ProductId>) -> Self {
        let mut hits = Self::default();
        for id in ranked {
            if !hits.positions.contains_key(&id) {
                hits.positions.insert(id.clone(), hits.ranked.len());
                hits.ranked.push(id);
            }
        }
        hits
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.positions.contains_key(id)
    }

    /// Zero-based relevance rank.
    pub fn rank(&self, id: &ProductId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn ranked(&self) -> &[ProductId] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}
