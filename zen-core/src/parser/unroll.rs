//! Tree normalization run between the pre- and postprocessors

use crate::tree::{AbbreviationTree, NodeId};

/// Replace every repeated node with `repeat_count` sibling clones numbered
/// from 1. A level is fully unrolled before its children are visited.
pub fn unroll(tree: &mut AbbreviationTree, id: NodeId) {
    let children = tree.children(id).to_vec();
    for (index, child) in children.into_iter().enumerate().rev() {
        if !tree.node(child).is_repeating() {
            continue;
        }
        let max_count = tree.node(child).repeat_count;
        tree.node_mut(child).repeat_count = 1;
        tree.set_counter(child, 1);
        tree.set_max_count(child, max_count);

        for counter in (2..=max_count).rev() {
            let copy = tree.clone_subtree(child);
            tree.set_counter(copy, counter);
            tree.insert_child(id, copy, Some(index + 1));
        }
    }

    for child in tree.children(id).to_vec() {
        unroll(tree, child);
    }
}

/// Splice the children of group nodes into their parent and drop empty nodes
pub fn squash(tree: &mut AbbreviationTree, id: NodeId) {
    let children = tree.children(id).to_vec();
    for child in children.into_iter().rev() {
        if tree.node(child).is_group() {
            squash(tree, child);
            let grandchildren = tree.children(child).to_vec();
            tree.replace(child, &grandchildren);
        }
    }

    for child in tree.children(id).to_vec() {
        squash(tree, child);
    }
}
