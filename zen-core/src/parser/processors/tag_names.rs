use super::super::{ParseContext, TreeProcessor};
use crate::error::ExpandError;
use crate::tag_name;
use crate::tree::{AbbreviationTree, NodeId};

/// Names nodes written without one (`.item`, `#main`) after their parent
pub struct TagNameResolver;

impl TreeProcessor for TagNameResolver {
    fn name(&self) -> &str {
        "tag-names"
    }

    fn process(&self, tree: &mut AbbreviationTree, _ctx: &ParseContext) -> Result<(), ExpandError> {
        let root = tree.root();
        resolve_names(tree, root);
        Ok(())
    }
}

fn resolve_names(tree: &mut AbbreviationTree, parent: NodeId) {
    for item in tree.children(parent).to_vec() {
        if tree.has_implicit_name(item) || tree.node(item).data.force_name_resolving {
            let name = tag_name::resolve(tree.name(parent));
            let node = tree.node_mut(item);
            node.name = name.to_string();
            node.data.name_resolved = true;
        }
        resolve_names(tree, item);
    }
}
