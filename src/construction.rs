//! Construction and capacity validation for [`crate::BPlusTree`].
//!
//! `OI`/`CI`/`OL` are `const usize` generics, checked at construction time
//! rather than the type level in the two places stable Rust cannot express
//! the bound statically: `CI == OI + 1` (see `node::Internal`'s doc
//! comment) and `H::MAX_VALUE` exceeding the fan-outs (spec calls for
//! `H_MAX > Oi + 2` and `H_MAX > Ol + 1`).

use crate::arena::Arena;
use crate::error::{BPlusTreeError, InitResult, KeyResult, ModifyResult};
use crate::handle::Handle;
use crate::params::min_order;
use crate::BPlusTree;

impl<K: Ord + Clone, V, H: Handle, const OI: usize, const CI: usize, const OL: usize>
    BPlusTree<K, V, H, OI, CI, OL>
{
    /// Builds an empty tree: a single empty leaf as the root.
    ///
    /// Returns `InvalidCapacity` if `OI` or `OL` is too small to admit a
    /// minimum fill of at least 1 (i.e. zero). `CI != OI + 1` and
    /// `H::MAX_VALUE` not exceeding the fan-outs are instantiation-time
    /// programming errors rather than data the caller chose at runtime —
    /// they can't be expressed as a `const` bound on sibling const
    /// generics without nightly support, so they stay `assert!`s.
    ///
    /// # Panics
    ///
    /// Panics if `CI != OI + 1`, or if `H::MAX_VALUE` is not strictly
    /// greater than both `OI + 2` and `OL + 1`.
    pub fn new() -> InitResult<Self> {
        assert_eq!(
            CI,
            OI + 1,
            "internal child-slot capacity CI must equal OI + 1"
        );
        assert!(
            H::MAX_VALUE > OI + 2,
            "handle type too narrow for internal fan-out OI"
        );
        assert!(
            H::MAX_VALUE > OL + 1,
            "handle type too narrow for leaf fan-out OL"
        );
        if OI < min_order(OI) {
            return Err(BPlusTreeError::InvalidCapacity {
                capacity: OI,
                min_required: min_order(OI),
            });
        }
        if OL < min_order(OL) {
            return Err(BPlusTreeError::InvalidCapacity {
                capacity: OL,
                min_required: min_order(OL),
            });
        }

        let mut arena: Arena<K, V, H, OI, CI, OL> = Arena::new();
        let root = arena.append_leaf(H::INVALID)?;
        Ok(Self {
            arena,
            root,
            first_leaf: root,
            last_leaf: root,
        })
    }

    pub fn insert(&mut self, key: K, value: V) -> ModifyResult<bool> {
        self.insert_impl(key, value)
    }

    pub fn erase(&mut self, pos: crate::Position<H>) -> ModifyResult<usize> {
        self.erase_impl(pos)
    }

    /// Looks up `key` and erases its first occurrence. `KeyNotFound` if
    /// `key` is absent.
    pub fn erase_key(&mut self, key: &K) -> KeyResult<usize> {
        let pos = self.find(key).ok_or(BPlusTreeError::KeyNotFound)?;
        self.erase_impl(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "CI must equal OI + 1")]
    fn rejects_mismatched_children_capacity() {
        let _ = BPlusTree::<i32, i32, u16, 4, 4, 4>::new();
    }

    #[test]
    #[should_panic(expected = "handle type too narrow")]
    fn rejects_narrow_handle() {
        // OI=255 needs H_MAX > 257, but u8::MAX_VALUE == 255
        let _ = BPlusTree::<i32, i32, u8, 255, 256, 4>::new();
    }

    #[test]
    fn rejects_zero_internal_capacity_without_panicking() {
        let err = BPlusTree::<i32, i32, u16, 0, 1, 4>::new().unwrap_err();
        assert_eq!(
            err,
            BPlusTreeError::InvalidCapacity {
                capacity: 0,
                min_required: 1
            }
        );
    }

    #[test]
    fn erase_key_reports_key_not_found() {
        let mut tree: BPlusTree<i32, i32, u16, 4, 5, 4> = BPlusTree::new().unwrap();
        assert_eq!(tree.erase_key(&7), Err(BPlusTreeError::KeyNotFound));
        tree.insert(7, 1).unwrap();
        assert_eq!(tree.erase_key(&7), Ok(1));
    }
}
