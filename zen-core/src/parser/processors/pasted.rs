//! Wrapping text with an abbreviation
//!
//! Before unrolling, every implicitly repeated node (`li*`) is repeated once
//! per non-empty line of the pasted text and remembers the lines. After
//! unrolling, each clone receives the line matching its counter. Text lands on
//! `$#` placeholders in content or attribute values when there are any,
//! otherwise it is added to the deepest node. Nothing repeated means the whole
//! text goes to the deepest node of the tree.

use super::super::{ParseContext, TreeProcessor};
use crate::error::ExpandError;
use crate::tabstops::insert_child_content;
use crate::tree::{AbbreviationTree, NodeId, Paste};
use crate::utils::split_by_lines;

/// Marker replaced with pasted text
pub const OUTPUT_PLACEHOLDER: &str = "$#";

/// Distributes pasted lines over implicitly repeated nodes
pub struct PastedLines;

impl TreeProcessor for PastedLines {
    fn name(&self) -> &str {
        "pasted-lines"
    }

    fn process(&self, tree: &mut AbbreviationTree, ctx: &ParseContext) -> Result<(), ExpandError> {
        let Some(pasted) = ctx.options.pasted_content.as_deref() else {
            return Ok(());
        };
        let lines: Vec<String> = split_by_lines(pasted)
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let root = tree.root();
        for id in tree.find_all(root, |t, n| t.node(n).has_implicit_repeat) {
            let node = tree.node_mut(id);
            node.repeat_count = lines.len().max(1);
            node.data.paste = Some(Paste::Lines(lines.clone()));
        }
        Ok(())
    }
}

/// Writes pasted text into the unrolled tree
pub struct PastedInsertion;

impl TreeProcessor for PastedInsertion {
    fn name(&self) -> &str {
        "pasted-insertion"
    }

    fn process(&self, tree: &mut AbbreviationTree, ctx: &ParseContext) -> Result<(), ExpandError> {
        let root = tree.root();
        let targets = tree.find_all(root, |t, n| t.node(n).data.paste.is_some());

        for id in &targets {
            let node = tree.node_mut(*id);
            let overwrite = node.data.paste_overwrites;
            let counter = node.counter;
            let text = node
                .data
                .paste
                .take()
                .and_then(|paste| paste.for_counter(counter).map(str::to_string));
            if let Some(text) = text.filter(|t| !t.is_empty()) {
                insert_pasted_content(tree, *id, &text, overwrite);
            }
        }

        if targets.is_empty() {
            if let Some(pasted) = ctx.options.pasted_content.as_deref() {
                insert_pasted_content(tree, root, pasted, false);
            }
        }

        strip_placeholders(tree, root);
        Ok(())
    }
}

fn has_output_placeholder(tree: &AbbreviationTree, id: NodeId) -> bool {
    let node = tree.node(id);
    node.content.contains(OUTPUT_PLACEHOLDER)
        || node.attributes.iter().any(|a| a.value.contains(OUTPUT_PLACEHOLDER))
}

/// Put `text` on the `$#` placeholders under `id`, or into its deepest node
pub fn insert_pasted_content(tree: &mut AbbreviationTree, id: NodeId, text: &str, overwrite: bool) {
    let mut holders = tree.find_all(id, has_output_placeholder);
    if has_output_placeholder(tree, id) {
        holders.insert(0, id);
    }

    if holders.is_empty() {
        let deepest = tree.deepest_child(id).unwrap_or(id);
        let node = tree.node_mut(deepest);
        node.content = if overwrite {
            text.to_string()
        } else {
            insert_child_content(&node.content, text, false)
        };
        return;
    }

    for holder in holders {
        let node = tree.node_mut(holder);
        node.content = node.content.replace(OUTPUT_PLACEHOLDER, text);
        for attr in &mut node.attributes {
            attr.value = attr.value.replace(OUTPUT_PLACEHOLDER, text);
        }
    }
}

fn strip_placeholders(tree: &mut AbbreviationTree, id: NodeId) {
    for child in tree.children(id).to_vec() {
        let node = tree.node_mut(child);
        if node.content.contains(OUTPUT_PLACEHOLDER) {
            node.content = node.content.replace(OUTPUT_PLACEHOLDER, "");
        }
        for attr in &mut node.attributes {
            if attr.value.contains(OUTPUT_PLACEHOLDER) {
                attr.value = attr.value.replace(OUTPUT_PLACEHOLDER, "");
            }
        }
        strip_placeholders(tree, child);
    }
}
