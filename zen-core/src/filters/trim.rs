use super::{Filter, FilterContext};
use crate::error::ExpandError;
use crate::preferences::Preferences;
use crate::tree::{AbbreviationTree, NodeId};
use regex::Regex;

/// Strips list markers (`1.`, `*`, `-`, `#`) from the start of node content,
/// typically from wrapped lines
pub struct TrimFilter;

impl Filter for TrimFilter {
    fn name(&self) -> &str {
        "t"
    }

    fn description(&self) -> &str {
        "Trim list markers from the beginning of each content line"
    }

    fn apply(&self, tree: &mut AbbreviationTree, ctx: &FilterContext) -> Result<(), ExpandError> {
        let pattern = ctx.preferences.get_text("filter.trimRegexp");
        let re = Regex::new(&pattern).map_err(|source| ExpandError::InvalidPattern {
            name: "filter.trimRegexp".into(),
            source,
        })?;
        let root = tree.root();
        process(tree, root, &re);
        Ok(())
    }
}

fn process(tree: &mut AbbreviationTree, parent: NodeId, re: &Regex) {
    for item in tree.children(parent).to_vec() {
        let node = tree.node_mut(item);
        if !node.content.is_empty() {
            node.content = re.replace(&node.content, "").into_owned();
        }
        process(tree, item, re);
    }
}

pub(crate) fn define_preferences(prefs: &mut Preferences) {
    prefs.define(
        "filter.trimRegexp",
        r"^[\s\x{a0}]*[\d#\-*\x{2022}]+\.?\s*",
        "Regular expression removed from the start of content by the `t` filter",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::OutputProfile;
    use crate::resources::Resources;

    #[test]
    fn test_markers_removed() {
        let resources = Resources::new();
        let prefs = Preferences::with_defaults();
        let profile = OutputProfile::default();
        let ctx = FilterContext {
            profile: &profile,
            preferences: &prefs,
            resources: &resources,
            syntax: "html",
        };
        let mut tree = AbbreviationTree::new();
        let root = tree.root();
        let items: Vec<_> = ["1. one", "  * two", "\u{2022} three", "4 four", "plain"]
            .iter()
            .map(|text| {
                let id = tree.add_new_child(root);
                tree.node_mut(id).content = text.to_string();
                id
            })
            .collect();
        TrimFilter.apply(&mut tree, &ctx).unwrap();
        let contents: Vec<_> = items.iter().map(|id| tree.node(*id).content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three", "four", "plain"]);
    }

    #[test]
    fn test_invalid_pattern_reported() {
        let resources = Resources::new();
        let mut prefs = Preferences::with_defaults();
        prefs.set("filter.trimRegexp", "[").unwrap();
        let profile = OutputProfile::default();
        let ctx = FilterContext {
            profile: &profile,
            preferences: &prefs,
            resources: &resources,
            syntax: "html",
        };
        let mut tree = AbbreviationTree::new();
        let err = TrimFilter.apply(&mut tree, &ctx).unwrap_err();
        assert!(matches!(err, ExpandError::InvalidPattern { ref name, .. } if name == "filter.trimRegexp"));
    }
}
