use super::{Filter, FilterContext};
use crate::error::ExpandError;
use crate::tree::{AbbreviationTree, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;

static SELECT_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s+select\s*=\s*(?:"[^"]*"|'[^']*')"#).unwrap());

const TAGS_WITH_SELECT: [&str; 2] = ["xsl:variable", "xsl:with-param"];

/// Removes `select` from `xsl:variable` and `xsl:with-param` elements that
/// received children, since the children then provide the value
pub struct XslFilter;

impl Filter for XslFilter {
    fn name(&self) -> &str {
        "xsl"
    }

    fn description(&self) -> &str {
        "Drop the select attribute of XSL variables with content"
    }

    fn apply(&self, tree: &mut AbbreviationTree, _ctx: &FilterContext) -> Result<(), ExpandError> {
        let root = tree.root();
        process(tree, root);
        Ok(())
    }
}

fn process(tree: &mut AbbreviationTree, parent: NodeId) {
    for item in tree.children(parent).to_vec() {
        let trim = !tree.is_snippet(item)
            && TAGS_WITH_SELECT.contains(&tree.name(item).to_lowercase().as_str())
            && !tree.children(item).is_empty();
        if trim {
            let node = tree.node_mut(item);
            node.start = SELECT_ATTRIBUTE.replace(&node.start, "").into_owned();
        }
        process(tree, item);
    }
}
