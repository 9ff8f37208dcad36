// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Identity mapping between sparse node ids and dense algorithm slots.
//!
//! Graph algorithms want dense integer indices (0..V) for array-based
//! state. Embedders hand us arbitrary 64-bit `NodeId`s. This module maps
//! between the two.

use fxhash::FxHashMap;
use strata_common::NodeId;

/// Bidirectional mapping between sparse `NodeId`s and dense slots.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    /// Dense slot -> sparse id
    slot_to_node: Vec<NodeId>,
    /// Sparse id -> dense slot
    node_to_slot: FxHashMap<NodeId, u32>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slot_to_node: Vec::with_capacity(capacity),
            node_to_slot: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert an id and return its slot. Inserting an id twice returns the
    /// slot assigned the first time.
    pub fn insert(&mut self, node: NodeId) -> u32 {
        if let Some(&slot) = self.node_to_slot.get(&node) {
            return slot;
        }
        let slot = self.slot_to_node.len() as u32;
        self.slot_to_node.push(node);
        self.node_to_slot.insert(node, slot);
        slot
    }

    #[inline]
    pub fn slot_of(&self, node: NodeId) -> Option<u32> {
        self.node_to_slot.get(&node).copied()
    }

    /// The id mapped to `slot`. Panics if the slot was never assigned.
    #[inline]
    pub fn node_at(&self, slot: u32) -> NodeId {
        self.slot_to_node[slot as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slot_to_node.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slot_to_node.is_empty()
    }

    /// Iterate over all (slot, id) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, NodeId)> + '_ {
        self.slot_to_node
            .iter()
            .enumerate()
            .map(|(slot, &node)| (slot as u32, node))
    }

    /// Memory usage in bytes.
    pub fn memory_size(&self) -> usize {
        self.slot_to_node.len() * std::mem::size_of::<NodeId>()
            + self.node_to_slot.len()
                * (std::mem::size_of::<NodeId>() + std::mem::size_of::<u32>() + 8)
    }
}

impl FromIterator<NodeId> for IdMap {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, upper) = iter.size_hint();
        let mut map = Self::with_capacity(upper.unwrap_or(lower));
        for node in iter {
            map.insert(node);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut map = IdMap::new();
        assert_eq!(map.insert(NodeId::new(100)), 0);
        assert_eq!(map.insert(NodeId::new(7)), 1);
        // Duplicate insert keeps the original slot
        assert_eq!(map.insert(NodeId::new(100)), 0);

        assert_eq!(map.slot_of(NodeId::new(7)), Some(1));
        assert_eq!(map.slot_of(NodeId::new(8)), None);
        assert_eq!(map.node_at(0), NodeId::new(100));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_iter_in_slot_order() {
        let map: IdMap = [3u64, 1, 2].into_iter().map(NodeId::new).collect();
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (0, NodeId::new(3)),
                (1, NodeId::new(1)),
                (2, NodeId::new(2)),
            ]
        );
    }
}
