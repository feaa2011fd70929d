//! Comments around elements
//!
//! Elements carrying one of the trigger attributes get `filter.commentBefore`
//! inserted before their opening tag and `filter.commentAfter` after their
//! closing tag. Both are small templates where `<%= ... %>` evaluates one of:
//!
//! - `attr("name")`, `attr("name", "before")`, `attr("name", "before", "after")`:
//!   the attribute value wrapped in `before`/`after`, or nothing when empty
//! - `name`: the tag name
//! - `padding`: indentation of the parent element

use super::{Filter, FilterContext};
use crate::error::ExpandError;
use crate::preferences::Preferences;
use crate::tree::{AbbreviationTree, NodeId};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EXPRESSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"<%=\s*(.*?)\s*%>").unwrap());
static ATTR_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^attr\s*\((.*)\)$").unwrap());
static STRING_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).unwrap());

pub struct CommentFilter;

impl Filter for CommentFilter {
    fn name(&self) -> &str {
        "c"
    }

    fn description(&self) -> &str {
        "Add comments around elements with id or class attributes"
    }

    fn apply(&self, tree: &mut AbbreviationTree, ctx: &FilterContext) -> Result<(), ExpandError> {
        let trigger = ctx.preferences.get_array("filter.commentTrigger");
        let settings = Settings {
            before: ctx.preferences.get_text("filter.commentBefore"),
            after: ctx.preferences.get_text("filter.commentAfter"),
            any: trigger.iter().any(|t| t == "*"),
            trigger,
        };
        if settings.before.is_empty() && settings.after.is_empty() {
            return Ok(());
        }
        let root = tree.root();
        process(tree, root, &settings);
        Ok(())
    }
}

struct Settings {
    before: String,
    after: String,
    trigger: Vec<String>,
    any: bool,
}

fn process(tree: &mut AbbreviationTree, parent: NodeId, settings: &Settings) {
    for item in tree.children(parent).to_vec() {
        if tree.is_block(item) && is_triggered(tree, item, settings) {
            add_comments(tree, item, settings);
        }
        process(tree, item, settings);
    }
}

fn is_triggered(tree: &AbbreviationTree, id: NodeId, settings: &Settings) -> bool {
    if settings.any {
        return true;
    }
    settings
        .trigger
        .iter()
        .any(|name| tree.attribute(id, name).is_some_and(|v| !v.is_empty()))
}

fn add_comments(tree: &mut AbbreviationTree, id: NodeId, settings: &Settings) {
    let before = evaluate(&settings.before, tree, id);
    let after = evaluate(&settings.after, tree, id);

    let node = tree.node_mut(id);
    if !before.is_empty() {
        node.start = node.start.replacen('<', &format!("{before}<"), 1);
    }
    if !after.is_empty() {
        node.end = node.end.replacen('>', &format!(">{after}"), 1);
    }
}

/// Expand every `<%= ... %>` in `template` for node `id`
pub fn evaluate(template: &str, tree: &AbbreviationTree, id: NodeId) -> String {
    EXPRESSION
        .replace_all(template, |caps: &Captures| {
            expression(caps.get(1).map_or("", |m| m.as_str()), tree, id)
        })
        .into_owned()
}

fn expression(expr: &str, tree: &AbbreviationTree, id: NodeId) -> String {
    match expr {
        "name" => tree.name(id).to_string(),
        "padding" => tree
            .parent(id)
            .map(|p| tree.node(p).padding.clone())
            .unwrap_or_default(),
        _ => {
            let Some(call) = ATTR_CALL.captures(expr) else {
                return String::new();
            };
            let args: Vec<&str> = STRING_ARG
                .captures_iter(call.get(1).map_or("", |m| m.as_str()))
                .filter_map(|c| c.get(1).or_else(|| c.get(2)).map(|m| m.as_str()))
                .collect();
            let Some(name) = args.first() else {
                return String::new();
            };
            match tree.attribute(id, name) {
                Some(value) if !value.is_empty() => format!(
                    "{}{}{}",
                    args.get(1).unwrap_or(&""),
                    value,
                    args.get(2).unwrap_or(&"")
                ),
                _ => String::new(),
            }
        }
    }
}

pub(crate) fn define_preferences(prefs: &mut Preferences) {
    prefs.define(
        "filter.commentAfter",
        "\n<!-- /<%= attr(\"id\", \"#\") %><%= attr(\"class\", \".\") %> -->",
        "Template inserted after the closing tag of a commented element",
    );
    prefs.define(
        "filter.commentBefore",
        "",
        "Template inserted before the opening tag of a commented element",
    );
    prefs.define(
        "filter.commentTrigger",
        "id, class",
        "Comma separated attribute names that trigger comments, `*` comments every block element",
    );
}
