//! Line breaks and indentation
//!
//! Seeds every node with `start`/`end` templates holding a `%s` slot for the
//! markup filters, plus the newlines and `padding` the profile asks for.

use super::{Filter, FilterContext};
use crate::error::ExpandError;
use crate::preferences::Preferences;
use crate::profile::TagNewline;
use crate::tree::{AbbreviationTree, NodeId};

const PLACEHOLDER: &str = "%s";

pub struct FormatFilter;

impl Filter for FormatFilter {
    fn name(&self) -> &str {
        "_format"
    }

    fn description(&self) -> &str {
        "Line breaks and indentation for markup output"
    }

    fn apply(&self, tree: &mut AbbreviationTree, ctx: &FilterContext) -> Result<(), ExpandError> {
        let root = tree.root();
        format_tree(tree, root, ctx);
        Ok(())
    }
}

/// Format the descendants of `parent`
pub fn format_tree(tree: &mut AbbreviationTree, parent: NodeId, ctx: &FilterContext) {
    let children = tree.children(parent).to_vec();
    for item in children {
        if tree.is_snippet(item) {
            process_snippet(tree, item, ctx);
        } else {
            process_tag(tree, item, ctx);
        }
        format_tree(tree, item, ctx);
    }
}

fn is_root(tree: &AbbreviationTree, id: NodeId) -> bool {
    tree.parent(id).is_none()
}

fn is_very_first_child(tree: &AbbreviationTree, id: NodeId) -> bool {
    tree.parent(id).is_some_and(|p| is_root(tree, p)) && tree.index(id) == 0
}

/// Whether enough adjacent inline siblings sit under `node` to break them apart
fn should_format_inline(tree: &AbbreviationTree, node: NodeId, ctx: &FilterContext) -> bool {
    let limit = ctx.profile.inline_break;
    if limit == 0 {
        return false;
    }
    let mut run = 0;
    for child in tree.children(node) {
        if tree.is_text_node(*child) || !tree.is_inline(*child) {
            run = 0;
        } else {
            run += 1;
        }
        if run >= limit {
            return true;
        }
    }
    false
}

fn should_add_line_break(tree: &AbbreviationTree, id: NodeId, ctx: &FilterContext) -> bool {
    if ctx.profile.tag_nl == TagNewline::Always || tree.is_block(id) {
        return true;
    }
    match tree.parent(id) {
        Some(parent) if ctx.profile.inline_break > 0 => should_format_inline(tree, parent, ctx),
        _ => false,
    }
}

fn should_break_child(tree: &AbbreviationTree, id: NodeId, ctx: &FilterContext) -> bool {
    tree.children(id)
        .first()
        .is_some_and(|first| should_add_line_break(tree, *first, ctx))
}

fn should_break_inside_inline(tree: &AbbreviationTree, id: NodeId, ctx: &FilterContext) -> bool {
    let has_block = tree
        .children(id)
        .iter()
        .any(|c| !tree.is_snippet(*c) && !tree.is_inline(*c));
    has_block || should_format_inline(tree, id, ctx)
}

fn has_block_sibling(tree: &AbbreviationTree, id: NodeId) -> bool {
    tree.parent(id).is_some_and(|p| tree.has_block_children(p))
}

fn tag_listed(prefs: &Preferences, preference: &str, name: &str) -> bool {
    prefs
        .get_array(preference)
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(name))
}

fn indentation(tree: &AbbreviationTree, id: NodeId, ctx: &FilterContext) -> String {
    if !ctx.profile.indent {
        return String::new();
    }
    let name = tree.name(id);
    if tag_listed(ctx.preferences, "format.forceIndentationForTags", name) {
        return ctx.indentation();
    }
    if tag_listed(ctx.preferences, "format.noIndentTags", name) {
        return String::new();
    }
    ctx.indentation()
}

fn process_snippet(tree: &mut AbbreviationTree, id: NodeId, ctx: &FilterContext) {
    let mut start = String::new();
    if !is_very_first_child(tree, id)
        && ctx.profile.tag_nl != TagNewline::Never
        && should_add_line_break(tree, id, ctx)
    {
        let parent_allows = tree
            .parent(id)
            .is_some_and(|p| is_root(tree, p) || !tree.is_inline(p));
        if parent_allows {
            start.push('\n');
        }
    }
    let node = tree.node_mut(id);
    node.start = start;
    node.end = String::new();
}

fn process_tag(tree: &mut AbbreviationTree, id: NodeId, ctx: &FilterContext) {
    let mut start = PLACEHOLDER.to_string();
    let mut end = PLACEHOLDER.to_string();
    let mut padding = None;

    if ctx.profile.tag_nl != TagNewline::Never && !tree.is_text_node(id) {
        let has_children = !tree.children(id).is_empty();
        let unary = tree.is_unary(id);
        let very_first = is_very_first_child(tree, id);
        let indent = indentation(tree, id, ctx);
        let force_nl = (ctx.profile.tag_nl == TagNewline::Always
            && (ctx.profile.tag_nl_leaf || has_children))
            || tag_listed(ctx.preferences, "format.forceIndentationForTags", tree.name(id));

        if should_add_line_break(tree, id, ctx) {
            let after_snippet_head = tree
                .parent(id)
                .is_some_and(|p| tree.is_snippet(p) && tree.index(id) == 0);
            if !very_first && !after_snippet_head {
                start.insert(0, '\n');
            }
            if tree.has_block_children(id)
                || should_break_child(tree, id, ctx)
                || (force_nl && !unary)
            {
                end.insert(0, '\n');
            }
            if tree.has_tags_in_content(id) || (force_nl && !has_children && !unary) {
                start.push('\n');
                start.push_str(&indent);
            }
        } else if tree.is_inline(id) && has_block_sibling(tree, id) && !very_first {
            start.insert(0, '\n');
        } else if tree.is_inline(id) && should_break_inside_inline(tree, id, ctx) {
            end.insert(0, '\n');
        }

        padding = Some(indent);
    }

    let node = tree.node_mut(id);
    node.start = start;
    node.end = end;
    if let Some(padding) = padding {
        node.padding = padding;
    }
}

pub(crate) fn define_preferences(prefs: &mut Preferences) {
    prefs.define(
        "format.noIndentTags",
        "html",
        "Comma separated tag names whose children are not indented",
    );
    prefs.define(
        "format.forceIndentationForTags",
        "body",
        "Comma separated tag names whose children are always placed on new, indented lines",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{OutputProfile, Profiles};
    use crate::resources::Resources;

    fn tag(tree: &mut AbbreviationTree, parent: NodeId, name: &str) -> NodeId {
        let id = tree.add_new_child(parent);
        let node = tree.node_mut(id);
        node.name = name.to_string();
        node.abbreviation = name.to_string();
        id
    }

    fn run(tree: &mut AbbreviationTree, profile: &OutputProfile) {
        let resources = Resources::new();
        let prefs = Preferences::with_defaults();
        let ctx = FilterContext {
            profile,
            preferences: &prefs,
            resources: &resources,
            syntax: "html",
        };
        let root = tree.root();
        format_tree(tree, root, &ctx);
    }

    fn parts(tree: &AbbreviationTree, id: NodeId) -> (&str, &str, &str) {
        let node = tree.node(id);
        (&node.start, &node.end, &node.padding)
    }

    #[test]
    fn test_block_children_break() {
        let mut tree = AbbreviationTree::new();
        let root = tree.root();
        let ul = tag(&mut tree, root, "ul");
        let li = tag(&mut tree, ul, "li");
        run(&mut tree, &OutputProfile::default());
        assert_eq!(parts(&tree, ul), ("%s", "\n%s", "\t"));
        assert_eq!(parts(&tree, li), ("\n%s", "%s", "\t"));
    }

    #[test]
    fn test_inline_siblings_stay_on_line() {
        let mut tree = AbbreviationTree::new();
        let root = tree.root();
        let p = tag(&mut tree, root, "p");
        let a = tag(&mut tree, p, "a");
        let b = tag(&mut tree, p, "b");
        run(&mut tree, &OutputProfile::default());
        assert_eq!(parts(&tree, p), ("%s", "%s", "\t"));
        assert_eq!(parts(&tree, a).0, "%s");
        assert_eq!(parts(&tree, b).0, "%s");
    }

    #[test]
    fn test_inline_break_threshold() {
        let mut tree = AbbreviationTree::new();
        let root = tree.root();
        let p = tag(&mut tree, root, "p");
        let spans: Vec<_> = (0..3).map(|_| tag(&mut tree, p, "span")).collect();
        run(&mut tree, &OutputProfile::default());
        assert_eq!(parts(&tree, p).1, "\n%s");
        assert_eq!(parts(&tree, spans[0]).0, "\n%s");
        assert_eq!(parts(&tree, spans[2]).0, "\n%s");
    }

    #[test]
    fn test_plain_profile_adds_nothing() {
        let mut tree = AbbreviationTree::new();
        let root = tree.root();
        let ul = tag(&mut tree, root, "ul");
        let li = tag(&mut tree, ul, "li");
        let profiles = Profiles::with_defaults();
        run(&mut tree, profiles.get("plain").unwrap());
        assert_eq!(parts(&tree, ul), ("%s", "%s", ""));
        assert_eq!(parts(&tree, li), ("%s", "%s", ""));
    }

    #[test]
    fn test_no_indent_and_forced_indent_tags() {
        let mut tree = AbbreviationTree::new();
        let root = tree.root();
        let html = tag(&mut tree, root, "html");
        let body = tag(&mut tree, html, "body");
        run(&mut tree, &OutputProfile::default());
        assert_eq!(parts(&tree, html).2, "");
        assert_eq!(parts(&tree, body), ("\n%s\n\t", "\n%s", "\t"));
    }

    #[test]
    fn test_always_profile_breaks_inline_tags() {
        let mut tree = AbbreviationTree::new();
        let root = tree.root();
        let div = tag(&mut tree, root, "div");
        let span = tag(&mut tree, div, "span");
        let profiles = Profiles::with_defaults();
        run(&mut tree, profiles.get("xml").unwrap());
        assert_eq!(parts(&tree, div).1, "\n%s");
        assert_eq!(parts(&tree, span).0, "\n%s");
    }
}
