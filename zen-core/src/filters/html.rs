//! HTML/XML output

use super::format::format_tree;
use super::{Filter, FilterContext};
use crate::error::ExpandError;
use crate::profile::BooleanAttributes;
use crate::tabstops::has_tabstops;
use crate::tree::{AbbreviationTree, NodeId};
use crate::utils::replace_placeholder;

pub struct HtmlFilter;

impl Filter for HtmlFilter {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Render nodes as HTML/XML tags"
    }

    fn apply(&self, tree: &mut AbbreviationTree, ctx: &FilterContext) -> Result<(), ExpandError> {
        let root = tree.root();
        format_tree(tree, root, ctx);
        let booleans = BooleanAttributes::from_preferences(ctx.preferences)?;
        process(tree, root, ctx, &booleans);
        Ok(())
    }
}

fn process(
    tree: &mut AbbreviationTree,
    parent: NodeId,
    ctx: &FilterContext,
    booleans: &BooleanAttributes,
) {
    let children = tree.children(parent).to_vec();
    for item in children {
        if !tree.is_snippet(item) {
            process_tag(tree, item, ctx, booleans);
        }
        process(tree, item, ctx, booleans);
    }
}

/// ` name="value"` for every attribute of the node
fn attributes_string(
    tree: &AbbreviationTree,
    id: NodeId,
    ctx: &FilterContext,
    booleans: &BooleanAttributes,
) -> String {
    let profile = ctx.profile;
    let quote = profile.attribute_quote();
    let cursor = profile.cursor();
    let compact = ctx.preferences.get_bool("profile.allowCompactBoolean") && profile.compact_bool;

    let mut result = String::new();
    for attr in tree.attribute_list(id) {
        let is_boolean = booleans.is_boolean(&attr.name, &attr.value);
        let name = profile.attribute_name(&attr.name);
        if is_boolean && compact {
            result.push(' ');
            result.push_str(&name);
            continue;
        }
        let value = if is_boolean {
            name.clone()
        } else if attr.value.is_empty() {
            cursor.to_string()
        } else {
            attr.value
        };
        result.push_str(&format!(" {name}={quote}{value}{quote}"));
    }
    result
}

fn process_tag(
    tree: &mut AbbreviationTree,
    id: NodeId,
    ctx: &FilterContext,
    booleans: &BooleanAttributes,
) {
    let profile = ctx.profile;
    let unary = tree.is_unary(id);
    let mut end_template = tree.node(id).end.clone();

    let (start, end) = if tree.is_text_node(id) {
        (String::new(), String::new())
    } else {
        let attrs = attributes_string(tree, id, ctx, booleans);
        let tag = profile.tag_name(tree.name(id));
        if unary {
            end_template.clear();
            (format!("<{tag}{attrs}{}>", profile.self_closing()), String::new())
        } else {
            (format!("<{tag}{attrs}>"), format!("</{tag}>"))
        }
    };

    let place_cursor = tree.children(id).is_empty() && !unary && {
        let content = &tree.node(id).content;
        content.is_empty() && !has_tabstops(content)
    };

    let node = tree.node_mut(id);
    node.start = replace_placeholder(&node.start, &start);
    node.end = replace_placeholder(&end_template, &end);
    if place_cursor {
        node.start.push_str(profile.cursor());
    }
}
