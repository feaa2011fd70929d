//! Resolved vocabulary entries
//!
//! A vocabulary lookup yields one of three kinds of resource. Elements carry a
//! concrete tag, snippets carry a literal output template and references carry
//! another abbreviation that is parsed and spliced in place of the node.

use crate::tree::Attribute;

#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Element(ElementResource),
    Snippet(String),
    Reference(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementResource {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Tag was written self-closed (`<br />`)
    pub is_empty: bool,
}

impl Resource {
    pub fn element(name: impl Into<String>, attributes: Vec<Attribute>, is_empty: bool) -> Self {
        Resource::Element(ElementResource {
            name: name.into(),
            attributes,
            is_empty,
        })
    }

    pub fn snippet(template: impl Into<String>) -> Self {
        Resource::Snippet(template.into())
    }

    pub fn reference(abbreviation: impl Into<String>) -> Self {
        Resource::Reference(abbreviation.into())
    }

    /// Short type name, as printed by the CLI
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::Element(_) => "element",
            Resource::Snippet(_) => "snippet",
            Resource::Reference(_) => "reference",
        }
    }

    pub fn is_snippet(&self) -> bool {
        matches!(self, Resource::Snippet(_))
    }

    pub fn is_empty_element(&self) -> bool {
        matches!(self, Resource::Element(e) if e.is_empty)
    }

    /// Raw text of the resource: template, abbreviation or rebuilt tag
    pub fn value(&self) -> String {
        match self {
            Resource::Snippet(text) | Resource::Reference(text) => text.clone(),
            Resource::Element(e) => {
                let attrs: String = e
                    .attributes
                    .iter()
                    .map(|a| format!(" {}=\"{}\"", a.name, a.value))
                    .collect();
                let close = if e.is_empty { " /" } else { "" };
                format!("<{}{}{}>", e.name, attrs, close)
            }
        }
    }
}
