//! Invariant checks exercised by tests: shape, ordering, parent linkage,
//! leaf-chain integrity, and uniform depth. Separate from `assert!` calls
//! sprinkled through the tree operations — this module is a standalone
//! auditor that can be run against a finished tree at any point, the way
//! a differential fuzz test does after every operation.

use crate::arena::Arena;
use crate::handle::Handle;
use crate::params::min_order;

/// Walks the whole tree and returns `Err` describing the first invariant
/// violation found, or `Ok(())` if every invariant in the module holds.
pub fn check_invariants<K, V, H, const OI: usize, const CI: usize, const OL: usize>(
    arena: &Arena<K, V, H, OI, CI, OL>,
    root: H,
    first_leaf: H,
) -> Result<(), String>
where
    K: Ord + Clone,
    H: Handle,
{
    let mut leaf_count = 0usize;
    let summary = check_subtree(arena, root, H::INVALID, true, &mut leaf_count)?;

    let mut seen = 0usize;
    let mut cursor = first_leaf;
    let mut prev_max: Option<K> = None;
    loop {
        let leaf = arena.leaf(cursor);
        if let (Some(pm), Some(first)) = (&prev_max, leaf.keys.as_slice().first()) {
            if pm > first {
                return Err("leaf chain is not in ascending key order".to_string());
            }
        }
        if let Some(last) = leaf.keys.as_slice().last() {
            prev_max = Some(last.clone());
        }
        seen += 1;
        if leaf.next.is_invalid() {
            break;
        }
        cursor = leaf.next;
        if seen > leaf_count + 1 {
            return Err("leaf chain does not terminate at the expected last leaf".to_string());
        }
    }
    if seen != leaf_count {
        return Err(format!(
            "leaf chain visited {} leaves but the tree has {}",
            seen, leaf_count
        ));
    }

    let _ = summary;
    Ok(())
}

struct Summary<K> {
    min: Option<K>,
    max: Option<K>,
    depth: usize,
}

fn check_subtree<K, V, H, const OI: usize, const CI: usize, const OL: usize>(
    arena: &Arena<K, V, H, OI, CI, OL>,
    handle: H,
    expected_parent: H,
    is_root: bool,
    leaf_count: &mut usize,
) -> Result<Summary<K>, String>
where
    K: Ord + Clone,
    H: Handle,
{
    let node = arena.get(handle);
    if node.parent() != expected_parent {
        return Err(format!(
            "node {:?} has parent {:?}, expected {:?}",
            handle,
            node.parent(),
            expected_parent
        ));
    }

    match node {
        crate::node::NodeBody::Leaf(leaf) => {
            *leaf_count += 1;
            if !is_root && leaf.size() < min_order(OL) {
                return Err(format!("leaf {:?} is underfull", handle));
            }
            if leaf.size() > OL {
                return Err(format!("leaf {:?} exceeds its fan-out", handle));
            }
            let keys = leaf.keys.as_slice();
            if keys.windows(2).any(|w| w[0] > w[1]) {
                return Err(format!("leaf {:?} keys are not sorted", handle));
            }
            if leaf.values.size() != leaf.keys.size() {
                return Err(format!("leaf {:?} has mismatched key/value counts", handle));
            }
            Ok(Summary {
                min: keys.first().cloned(),
                max: keys.last().cloned(),
                depth: 0,
            })
        }
        crate::node::NodeBody::Internal(internal) => {
            if !is_root && internal.size() < min_order(OI) {
                return Err(format!("internal {:?} is underfull", handle));
            }
            if internal.size() > OI {
                return Err(format!("internal {:?} exceeds its fan-out", handle));
            }
            if internal.children.size() != internal.keys.size() + 1 {
                return Err(format!(
                    "internal {:?} has {} children but {} keys",
                    handle,
                    internal.children.size(),
                    internal.keys.size()
                ));
            }
            if is_root && internal.children.size() < 2 {
                return Err("internal root must have at least two children".to_string());
            }

            let mut depth = None;
            let mut min = None;
            let mut max = None;
            let mut prev_max: Option<K> = None;
            for (i, &child) in internal.children.iter().enumerate() {
                let summary = check_subtree(arena, child, handle, false, leaf_count)?;
                match depth {
                    None => depth = Some(summary.depth),
                    Some(d) if d == summary.depth => {}
                    Some(_) => return Err("leaves are not all at the same depth".to_string()),
                }
                if i == 0 {
                    min = summary.min.clone();
                } else {
                    let router = &internal.keys.as_slice()[i - 1];
                    if let Some(left_max) = &prev_max {
                        if left_max > router {
                            return Err(format!(
                                "router key at internal {:?} index {} is below its left subtree's maximum",
                                handle, i - 1
                            ));
                        }
                    }
                    if let Some(child_min) = &summary.min {
                        if router > child_min {
                            return Err(format!(
                                "router key at internal {:?} index {} exceeds its right subtree's minimum",
                                handle, i - 1
                            ));
                        }
                    }
                }
                prev_max = summary.max.clone();
                max = summary.max.or(max);
            }
            Ok(Summary {
                min,
                max,
                depth: depth.unwrap_or(0) + 1,
            })
        }
    }
}
