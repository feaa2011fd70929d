//! HAML output

use super::format::format_tree;
use super::{Filter, FilterContext};
use crate::error::ExpandError;
use crate::profile::SelfClosing;
use crate::tree::{AbbreviationTree, NodeId};
use crate::utils::replace_placeholder;

pub struct HamlFilter;

impl Filter for HamlFilter {
    fn name(&self) -> &str {
        "haml"
    }

    fn description(&self) -> &str {
        "Render nodes as HAML lines"
    }

    fn apply(&self, tree: &mut AbbreviationTree, ctx: &FilterContext) -> Result<(), ExpandError> {
        let root = tree.root();
        format_tree(tree, root, ctx);
        process(tree, root, ctx);
        Ok(())
    }
}

fn process(tree: &mut AbbreviationTree, parent: NodeId, ctx: &FilterContext) {
    let children = tree.children(parent).to_vec();
    for item in children {
        if !tree.is_snippet(item) {
            process_tag(tree, item, ctx);
        }
        process(tree, item, ctx);
    }
}

/// `#id.class` shorthand plus a `{:name => "value"}` hash for the rest
fn attributes_string(tree: &AbbreviationTree, id: NodeId, ctx: &FilterContext) -> String {
    let profile = ctx.profile;
    let cursor = profile.cursor();
    let mut shorthand = String::new();
    let mut hash = Vec::new();

    for attr in tree.attribute_list(id) {
        let name = profile.attribute_name(&attr.name);
        match name.to_lowercase().as_str() {
            "id" if !attr.value.is_empty() => {
                shorthand.push('#');
                shorthand.push_str(&attr.value);
            }
            "class" if !attr.value.is_empty() => {
                for class in attr.value.split_whitespace() {
                    shorthand.push('.');
                    shorthand.push_str(class);
                }
            }
            _ => {
                let value = if attr.value.is_empty() {
                    cursor
                } else {
                    attr.value.as_str()
                };
                hash.push(format!(":{name} => \"{value}\""));
            }
        }
    }

    if !hash.is_empty() {
        shorthand.push('{');
        shorthand.push_str(&hash.join(", "));
        shorthand.push('}');
    }
    shorthand
}

fn process_tag(tree: &mut AbbreviationTree, id: NodeId, ctx: &FilterContext) {
    if tree.is_text_node(id) {
        let node = tree.node_mut(id);
        node.start = replace_placeholder(&node.start, "");
        node.end = replace_placeholder(&node.end, "");
        return;
    }

    let profile = ctx.profile;
    let attrs = attributes_string(tree, id, ctx);
    let name = profile.tag_name(tree.name(id));
    let unary = tree.is_unary(id);

    let tag = if name.eq_ignore_ascii_case("div") && !attrs.is_empty() && !attrs.starts_with('{') {
        String::new()
    } else {
        format!("%{name}")
    };
    let self_closing = if unary && profile.self_closing_tag != SelfClosing::Html {
        "/"
    } else {
        ""
    };

    let place_cursor = tree.children(id).is_empty() && !unary && tree.node(id).content.is_empty();

    let node = tree.node_mut(id);
    node.start = replace_placeholder(&node.start, &format!("{tag}{attrs}{self_closing} "));
    node.end = String::new();
    if place_cursor {
        node.start.push_str(profile.cursor());
    }
}
