use super::{Filter, FilterContext};
use crate::error::ExpandError;
use crate::tree::{AbbreviationTree, NodeId};

/// Escapes markup characters so the output can be pasted as text
pub struct EscapeFilter;

impl Filter for EscapeFilter {
    fn name(&self) -> &str {
        "e"
    }

    fn description(&self) -> &str {
        "Escape <, > and & in the output"
    }

    fn apply(&self, tree: &mut AbbreviationTree, _ctx: &FilterContext) -> Result<(), ExpandError> {
        let root = tree.root();
        process(tree, root);
        Ok(())
    }
}

fn process(tree: &mut AbbreviationTree, parent: NodeId) {
    for item in tree.children(parent).to_vec() {
        let node = tree.node_mut(item);
        node.start = escape_chars(&node.start);
        node.end = escape_chars(&node.end);
        node.content = escape_chars(&node.content);
        process(tree, item);
    }
}

pub fn escape_chars(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            _ => result.push(ch),
        }
    }
    result
}
