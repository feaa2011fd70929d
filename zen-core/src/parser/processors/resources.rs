//! Vocabulary matching
//!
//! Attaches the matched [`Resource`] to every node. Snippets get their template
//! as content. References are parsed into the same tree and replace the node:
//! its repeat count moves to the implicitly repeated nodes of the reference
//! (or its top-level nodes), its children move to the deepest node, its text
//! goes to the deepest node and its attributes are copied onto every top-level
//! node.

use super::super::grammar::parse_into;
use super::super::{ParseContext, TreeProcessor};
use crate::element::Resource;
use crate::error::ExpandError;
use crate::tabstops::insert_child_content;
use crate::tree::{AbbreviationTree, NodeId};
use tracing::{debug, trace};

/// Nesting limit for references that expand to other references
const MAX_REFERENCE_DEPTH: usize = 32;

pub struct ResourceMatcher;

impl TreeProcessor for ResourceMatcher {
    fn name(&self) -> &str {
        "resources"
    }

    fn process(&self, tree: &mut AbbreviationTree, ctx: &ParseContext) -> Result<(), ExpandError> {
        let root = tree.root();
        let mut stack = Vec::new();
        match_children(tree, root, ctx, &mut stack);
        Ok(())
    }
}

fn match_children(
    tree: &mut AbbreviationTree,
    parent: NodeId,
    ctx: &ParseContext,
    stack: &mut Vec<String>,
) {
    for child in tree.children(parent).to_vec() {
        match_node(tree, child, ctx, stack);
    }
}

fn match_node(tree: &mut AbbreviationTree, id: NodeId, ctx: &ParseContext, stack: &mut Vec<String>) {
    let resource = ctx
        .resources
        .matched_resource(tree, id, &ctx.options.syntax);
    trace!(
        name = %tree.node(id).name,
        kind = resource.as_ref().map_or("none", Resource::kind),
        "resource matched"
    );

    match resource {
        Some(Resource::Snippet(template)) => {
            let node = tree.node_mut(id);
            let current = if node.text.is_empty() {
                node.content.clone()
            } else {
                node.text.clone()
            };
            node.content = if current.is_empty() {
                template.clone()
            } else {
                insert_child_content(&template, &current, true)
            };
            node.data.resource = Some(Resource::Snippet(template));
        }
        Some(Resource::Reference(abbreviation)) => {
            if expand_reference(tree, id, &abbreviation, ctx, stack) {
                return;
            }
        }
        other => tree.node_mut(id).data.resource = other,
    }

    match_children(tree, id, ctx, stack);
}

/// Splice the parsed reference in place of `id`. Returns `false`, leaving the
/// node untouched, when the reference is cyclic, too deep or does not parse.
fn expand_reference(
    tree: &mut AbbreviationTree,
    id: NodeId,
    abbreviation: &str,
    ctx: &ParseContext,
    stack: &mut Vec<String>,
) -> bool {
    let name = tree.node(id).name.clone();
    if stack.contains(&name) || stack.len() >= MAX_REFERENCE_DEPTH {
        debug!(name = %name, depth = stack.len(), "reference cycle cut");
        return false;
    }

    let subtree = tree.create_node();
    if let Err(err) = parse_into(tree, subtree, abbreviation) {
        debug!(name = %name, error = %err, "reference does not parse");
        return false;
    }

    stack.push(name);
    match_children(tree, subtree, ctx, stack);
    stack.pop();

    let node = tree.node(id).clone();
    if node.is_repeating() {
        let mut targets = tree.find_all(subtree, |t, n| t.node(n).has_implicit_repeat);
        if targets.is_empty() {
            targets = tree.children(subtree).to_vec();
        }
        for target in targets {
            let target = tree.node_mut(target);
            target.repeat_count = node.repeat_count;
            target.has_implicit_repeat = node.has_implicit_repeat;
        }
    }

    let top_level = tree.children(subtree).to_vec();
    let deepest = tree.deepest_child(subtree);
    if let Some(deepest) = deepest {
        let moved = node.children.clone();
        tree.move_children(id, deepest);
        if !node.text.is_empty() {
            let target = tree.node_mut(deepest);
            target.content = insert_child_content(&target.content, &node.text, true);
            target.text = node.text.clone();
        }
        for child in moved {
            match_node(tree, child, ctx, stack);
        }
    }

    for top in &top_level {
        for attr in &node.attributes {
            tree.set_attribute(*top, &attr.name, &attr.value);
        }
    }

    tree.replace(id, &top_level);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::parse_abbreviation;
    use crate::parser::ParseOptions;
    use crate::resources::{Resources, VocabularyKind};
    use serde_json::json;

    fn matched(abbr: &str, resources: &Resources) -> AbbreviationTree {
        let options = ParseOptions::default();
        let ctx = ParseContext {
            options: &options,
            resources,
        };
        let mut tree = parse_abbreviation(abbr).unwrap();
        ResourceMatcher.process(&mut tree, &ctx).unwrap();
        tree
    }

    fn resources(html: serde_json::Value) -> Resources {
        let mut resources = Resources::new();
        resources.set_vocabulary(json!({ "html": html }), VocabularyKind::System);
        resources
    }

    fn names(tree: &AbbreviationTree, id: NodeId) -> Vec<String> {
        tree.children(id)
            .iter()
            .map(|c| tree.name(*c).to_string())
            .collect()
    }

    #[test]
    fn test_element_and_snippet() {
        let res = resources(json!({
            "snippets": {"cc": "<!-- ${child} -->"},
            "abbreviations": {"a": "<a href=\"\">"}
        }));
        let tree = matched("a+cc{note}", &res);
        let root = tree.root();
        let a = tree.children(root)[0];
        let cc = tree.children(root)[1];
        assert_eq!(tree.attribute(a, "href").as_deref(), Some(""));
        assert!(tree.is_snippet(cc));
        assert_eq!(tree.node(cc).content, "<!-- note${child} -->");
    }

    #[test]
    fn test_reference_splicing() {
        let res = resources(json!({"abbreviations": {"ref": "span>em"}}));
        let tree = matched("div>ref[title=x]>b", &res);
        let root = tree.root();
        let div = tree.children(root)[0];
        assert_eq!(names(&tree, div), vec!["span"]);
        let span = tree.children(div)[0];
        assert_eq!(tree.attribute(span, "title").as_deref(), Some("x"));
        let em = tree.children(span)[0];
        assert_eq!(tree.attribute(em, "title"), None);
        assert_eq!(names(&tree, em), vec!["b"]);
    }

    #[test]
    fn test_reference_repeat_transfer() {
        let res = resources(json!({"abbreviations": {"ol+": "ol>li*", "pair": "a+b"}}));
        let tree = matched("ol+*3", &res);
        let ol = tree.children(tree.root())[0];
        let li = tree.children(ol)[0];
        assert_eq!(tree.node(ol).repeat_count, 1);
        assert_eq!(tree.node(li).repeat_count, 3);

        let tree = matched("pair*2", &res);
        let root = tree.root();
        assert!(tree.children(root).iter().all(|c| tree.node(*c).repeat_count == 2));
    }

    #[test]
    fn test_cyclic_reference_left_unresolved() {
        let res = resources(json!({"abbreviations": {"x": "y", "y": "x>p"}}));
        let tree = matched("x", &res);
        let root = tree.root();
        // x -> y -> x (cut), the inner x stays as a plain node
        let first = tree.children(root)[0];
        assert_eq!(tree.node(first).name, "x");
        assert_eq!(names(&tree, first), vec!["p"]);
    }

    #[test]
    fn test_nested_references_resolve() {
        let res = resources(json!({"abbreviations": {
            "a": "<a href=\"\">",
            "list": "ul>item",
            "item": "li>a"
        }}));
        let tree = matched("list", &res);
        let ul = tree.children(tree.root())[0];
        let li = tree.children(ul)[0];
        let a = tree.children(li)[0];
        assert_eq!(tree.name(li), "li");
        assert_eq!(tree.attribute(a, "href").as_deref(), Some(""));
    }
}
