use super::{Filter, FilterContext};
use crate::error::ExpandError;
use crate::tree::{AbbreviationTree, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]").unwrap());

/// Collapses the output onto a single line
pub struct SingleLineFilter;

impl Filter for SingleLineFilter {
    fn name(&self) -> &str {
        "s"
    }

    fn description(&self) -> &str {
        "Remove line breaks and leading indentation"
    }

    fn apply(&self, tree: &mut AbbreviationTree, _ctx: &FilterContext) -> Result<(), ExpandError> {
        let root = tree.root();
        process(tree, root);
        Ok(())
    }
}

fn process(tree: &mut AbbreviationTree, parent: NodeId) {
    for item in tree.children(parent).to_vec() {
        let snippet = tree.is_snippet(item);
        let node = tree.node_mut(item);
        if !snippet {
            node.start = LEADING_SPACE.replace(&node.start, "").into_owned();
            node.end = LEADING_SPACE.replace(&node.end, "").into_owned();
        }
        node.start = LINE_BREAKS.replace_all(&node.start, "").into_owned();
        node.end = LINE_BREAKS.replace_all(&node.end, "").into_owned();
        node.content = LINE_BREAKS.replace_all(&node.content, "").into_owned();
        process(tree, item);
    }
}
