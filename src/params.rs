//! The compile-time parameter bundle `(K, V, H, OI, OL)` and its derived
//! constants.
//!
//! `K`, `V`, and `H` are ordinary type parameters on [`crate::BPlusTree`];
//! `OI` (internal fan-out) and `OL` (leaf fan-out) are `const usize`
//! generics on the same type. `Params` exists purely to give the derived
//! minima (`MI`, `ML`) and the `get_order`/`get_min_order` predicates a
//! single named home, mirroring the `traits` bundle the design calls for.

/// `max(order / 2, 1)` — the minimum fill any non-root node of that order
/// must maintain.
pub const fn min_order(order: usize) -> usize {
    let half = order / 2;
    if half > 1 {
        half
    } else {
        1
    }
}

/// Derived constants for one `(OI, OL)` instantiation.
pub struct Params<const OI: usize, const OL: usize>;

impl<const OI: usize, const OL: usize> Params<OI, OL> {
    /// Minimum fill for a non-root internal node.
    pub const MI: usize = min_order(OI);
    /// Minimum fill for a non-root leaf.
    pub const ML: usize = min_order(OL);

    /// Maximum fill (the fan-out itself) for the given node kind.
    pub const fn get_order(is_leaf: bool) -> usize {
        if is_leaf {
            OL
        } else {
            OI
        }
    }

    /// Minimum fill for the given node kind.
    pub const fn get_min_order(is_leaf: bool) -> usize {
        if is_leaf {
            Self::ML
        } else {
            Self::MI
        }
    }
}
