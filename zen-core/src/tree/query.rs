//! Node classification used by the formatting filters

use super::{optimize_attributes, AbbreviationTree, Attribute, NodeId};
use crate::element::Resource;
use crate::tag_name;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"</?[\w:\-]+(?:\s+[\w\-:]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^>\s]+))?)*\s*/?>"#,
    )
    .unwrap()
});

/// Whether `text` contains something that looks like a markup tag
pub fn has_tags(text: &str) -> bool {
    !text.is_empty() && TAG_PATTERN.is_match(text)
}

impl AbbreviationTree {
    /// Effective tag name: a matched element resource wins over the parsed name
    pub fn name(&self, id: NodeId) -> &str {
        match &self.node(id).data.resource {
            Some(Resource::Element(element)) => &element.name,
            _ => &self.node(id).name,
        }
    }

    /// Matched element attributes followed by the node's own, merged
    pub fn attribute_list(&self, id: NodeId) -> Vec<Attribute> {
        let node = self.node(id);
        let inherited = match &node.data.resource {
            Some(Resource::Element(element)) => element.attributes.clone(),
            _ => Vec::new(),
        };
        optimize_attributes(inherited.into_iter().chain(node.attributes.iter().cloned()))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.attribute_list(id)
            .into_iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value)
    }

    pub fn is_text_node(&self, id: NodeId) -> bool {
        self.name(id).is_empty() && self.attribute_list(id).is_empty()
    }

    pub fn has_implicit_name(&self, id: NodeId) -> bool {
        self.node(id).name.is_empty() && !self.is_text_node(id)
    }

    pub fn is_snippet(&self, id: NodeId) -> bool {
        matches!(self.node(id).data.resource, Some(Resource::Snippet(_)))
    }

    /// Rendered without a closing tag
    pub fn is_unary(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if !node.children.is_empty() || !node.text.is_empty() || self.is_snippet(id) {
            return false;
        }
        match &node.data.resource {
            Some(resource) if resource.is_empty_element() => true,
            _ => tag_name::is_empty_element(self.name(id)),
        }
    }

    pub fn is_inline(&self, id: NodeId) -> bool {
        let name = self.name(id);
        self.is_text_node(id) || name.is_empty() || tag_name::is_inline_level(name)
    }

    pub fn is_block(&self, id: NodeId) -> bool {
        self.is_snippet(id) || !self.is_inline(id)
    }

    pub fn has_tags_in_content(&self, id: NodeId) -> bool {
        has_tags(&self.node(id).content)
    }

    pub fn has_block_children(&self, id: NodeId) -> bool {
        (self.has_tags_in_content(id) && self.is_block(id))
            || self.children(id).iter().any(|c| self.is_block(*c))
    }
}
