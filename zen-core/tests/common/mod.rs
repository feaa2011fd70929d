//! Shared helpers for integration tests

use zen_core::{AbbreviationTree, ExpandOptions, Expander, NodeId};

pub fn expander() -> Expander {
    Expander::with_defaults().unwrap()
}

/// Expand `abbr` for `syntax` with the default vocabulary
pub fn expand(abbr: &str, syntax: &str) -> String {
    expander()
        .expand(abbr, &ExpandOptions::for_syntax(syntax))
        .unwrap()
}

pub fn html(abbr: &str) -> String {
    expand(abbr, "html")
}

/// Compact outline of a tree: `name[children]`, siblings joined by `,`
pub fn outline(tree: &AbbreviationTree, id: NodeId) -> String {
    tree.children(id)
        .iter()
        .map(|child| {
            let name = tree.name(*child);
            if tree.children(*child).is_empty() {
                name.to_string()
            } else {
                format!("{}[{}]", name, outline(tree, *child))
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
