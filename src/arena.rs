//! The node arena: a growable, handle-indexed sequence of [`NodeBody`]
//! values. No pointers cross node boundaries — a handle is the only way
//! one node refers to another, and the arena is the only thing that turns
//! a handle back into a node.
//!
//! Deleted nodes keep their slot (soft delete, see [`Arena::deallocate`]);
//! this design never recycles a handle once minted.

use crate::error::BPlusTreeError;
use crate::handle::Handle;
use crate::node::{Internal, Leaf, NodeBody};

#[derive(Debug)]
pub struct Arena<K, V, H, const OI: usize, const CI: usize, const OL: usize> {
    storage: Vec<NodeBody<K, V, H, OI, CI, OL>>,
}

impl<K: Ord, V, H: Handle, const OI: usize, const CI: usize, const OL: usize>
    Arena<K, V, H, OI, CI, OL>
{
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
        }
    }

    fn next_handle(&self) -> Result<H, BPlusTreeError> {
        let next = self.storage.len();
        if next >= H::MAX_VALUE {
            return Err(BPlusTreeError::HandleSpaceExhausted);
        }
        Ok(H::from_usize(next))
    }

    pub fn append_internal(&mut self, parent: H) -> Result<H, BPlusTreeError> {
        let handle = self.next_handle()?;
        self.storage
            .push(NodeBody::Internal(Internal::new(handle, parent)));
        Ok(handle)
    }

    pub fn append_leaf(&mut self, parent: H) -> Result<H, BPlusTreeError> {
        let handle = self.next_handle()?;
        self.storage
            .push(NodeBody::Leaf(Leaf::new(handle, parent)));
        Ok(handle)
    }

    pub fn get(&self, handle: H) -> &NodeBody<K, V, H, OI, CI, OL> {
        &self.storage[handle.to_usize()]
    }

    pub fn get_mut(&mut self, handle: H) -> &mut NodeBody<K, V, H, OI, CI, OL> {
        &mut self.storage[handle.to_usize()]
    }

    pub fn internal(&self, handle: H) -> &Internal<K, H, OI, CI> {
        self.get(handle).as_internal()
    }

    pub fn internal_mut(&mut self, handle: H) -> &mut Internal<K, H, OI, CI> {
        self.get_mut(handle).as_internal_mut()
    }

    pub fn leaf(&self, handle: H) -> &Leaf<K, V, H, OL> {
        self.get(handle).as_leaf()
    }

    pub fn leaf_mut(&mut self, handle: H) -> &mut Leaf<K, V, H, OL> {
        self.get_mut(handle).as_leaf_mut()
    }

    pub fn is_leaf(&self, handle: H) -> bool {
        self.get(handle).is_leaf()
    }

    /// Soft-deletes the node at `handle`: clears its contents and detaches
    /// it from the tree. The slot itself is never reused.
    pub fn deallocate(&mut self, handle: H) {
        self.get_mut(handle).mark_deleted();
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }
}

impl<K: Ord, V, H: Handle, const OI: usize, const CI: usize, const OL: usize> Default
    for Arena<K, V, H, OI, CI, OL>
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_sequential_handles() {
        let mut arena: Arena<i32, i32, u16, 4, 5, 4> = Arena::new();
        let a = arena.append_leaf(u16::INVALID).unwrap();
        let b = arena.append_leaf(u16::INVALID).unwrap();
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert!(arena.is_leaf(a));
    }

    #[test]
    fn deallocate_clears_but_keeps_slot() {
        let mut arena: Arena<i32, i32, u16, 4, 5, 4> = Arena::new();
        let a = arena.append_leaf(u16::INVALID).unwrap();
        arena.leaf_mut(a).keys.push_back(1).unwrap();
        arena.deallocate(a);
        assert!(arena.leaf(a).keys.is_empty());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn exhausts_handle_space() {
        let mut arena: Arena<i32, i32, u8, 4, 5, 4> = Arena::new();
        for _ in 0..u8::MAX_VALUE {
            arena.append_leaf(u8::INVALID).unwrap();
        }
        assert_eq!(
            arena.append_leaf(u8::INVALID),
            Err(BPlusTreeError::HandleSpaceExhausted)
        );
    }
}
