//! Global inode registry.
//!
//! Owns every live `RamNode` in an arena of slots. Identifiers are dense:
//! `by_id[i]` is the slot of the node whose id is `i`, and removing a node
//! shifts every higher id down by one. An id cached across a removal may
//! therefore name a different node afterwards.

use alloc::vec::Vec;
use super::inode::{NodeIndex, RamNode};

#[derive(Debug, Default)]
pub(crate) struct InodeRegistry {
    slots: Vec<Option<RamNode>>,
    vacant: Vec<NodeIndex>,
    by_id: Vec<NodeIndex>,
}

impl InodeRegistry {
    pub fn new() -> Self {
        InodeRegistry {
            slots: Vec::new(),
            vacant: Vec::new(),
            by_id: Vec::new(),
        }
    }

    /// Register a node, assigning it the next identifier.
    pub fn insert(&mut self, mut node: RamNode) -> NodeIndex {
        node.id = self.by_id.len() as u32;
        let idx = match self.vacant.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.by_id.push(idx);
        idx
    }

    /// Remove the node with this id and renumber the survivors.
    pub fn remove(&mut self, id: u32) -> Option<RamNode> {
        let pos = id as usize;
        if pos >= self.by_id.len() {
            return None;
        }
        let idx = self.by_id[pos];
        let node = self.slots[idx].take()?;
        self.by_id.remove(pos);
        self.vacant.push(idx);

        for &survivor in &self.by_id[pos..] {
            if let Some(n) = self.slots[survivor].as_mut() {
                n.id -= 1;
            }
        }
        Some(node)
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&RamNode> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut RamNode> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    pub fn lookup_by_id(&self, id: u32) -> Option<&RamNode> {
        let idx = *self.by_id.get(id as usize)?;
        self.get(idx)
    }

    /// Every live node, ascending by id.
    pub fn enumerate_all(&self) -> impl DoubleEndedIterator<Item = &RamNode> + '_ {
        self.by_id.iter().filter_map(move |&idx| self.get(idx))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }
}
