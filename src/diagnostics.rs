//! Nested, human-readable serialization of a tree for test snapshots.
//!
//! Not a wire format — field names and nesting are stable so cross-run
//! diffs stay meaningful, but there is no parser and no version tag.

use crate::arena::Arena;
use crate::handle::Handle;
use std::fmt::{self, Write as _};

fn handle_label<H: Handle>(h: H) -> String {
    if h.is_invalid() {
        "INVALID".to_string()
    } else {
        h.to_usize().to_string()
    }
}

/// Renders the subtree rooted at `handle` as the nested form described at
/// the top of this module, indented 4 spaces per level.
pub fn describe<K, V, H, const OI: usize, const CI: usize, const OL: usize>(
    arena: &Arena<K, V, H, OI, CI, OL>,
    handle: H,
) -> String
where
    K: Ord + fmt::Display,
    V: fmt::Display,
    H: Handle,
{
    let mut out = String::new();
    write_node(arena, handle, 0, &mut out);
    out
}

fn write_node<K, V, H, const OI: usize, const CI: usize, const OL: usize>(
    arena: &Arena<K, V, H, OI, CI, OL>,
    handle: H,
    depth: usize,
    out: &mut String,
) where
    K: Ord + fmt::Display,
    V: fmt::Display,
    H: Handle,
{
    let indent = "    ".repeat(depth);
    let inner = "    ".repeat(depth + 1);
    let node = arena.get(handle);
    writeln!(out, "{indent}\"{}\": {{", handle_label(handle)).unwrap();
    writeln!(out, "{inner}\"parent\": {},", handle_label(node.parent())).unwrap();
    match node {
        crate::node::NodeBody::Internal(n) => {
            writeln!(out, "{inner}\"keys\": [{}],", join(n.keys.iter())).unwrap();
            writeln!(out, "{inner}\"children\": {{").unwrap();
            for &child in n.children.iter() {
                write_node(arena, child, depth + 2, out);
            }
            writeln!(out, "{inner}}}").unwrap();
        }
        crate::node::NodeBody::Leaf(n) => {
            writeln!(out, "{inner}\"keys\": [{}],", join(n.keys.iter())).unwrap();
            writeln!(out, "{inner}\"values\": [{}],", join(n.values.iter())).unwrap();
            writeln!(out, "{inner}\"previous\": {},", handle_label(n.prev)).unwrap();
            writeln!(out, "{inner}\"next\": {}", handle_label(n.next)).unwrap();
        }
    }
    writeln!(out, "{indent}}}").unwrap();
}

fn join<'a, T: fmt::Display + 'a>(items: impl Iterator<Item = &'a T>) -> String {
    items
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
