//! Turning raw vocabulary strings into [`Resource`] values

use crate::element::Resource;
use crate::tabstops::CARET;
use crate::tree::Attribute;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^<(\w+:?[\w\-]*)((?:\s+[@!]?[\w:\-]+\s*=\s*(?:"[^"]*"|'[^']*'|[^>\s]+))*)\s*(/?)>"#,
    )
    .unwrap()
});

static TAG_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([@!]?[\w\-:]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^>\s]+))"#).unwrap()
});

/// Which part of a syntax section an entry was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Snippet,
    Abbreviation,
}

impl ItemKind {
    pub fn section(self) -> &'static str {
        match self {
            ItemKind::Snippet => "snippets",
            ItemKind::Abbreviation => "abbreviations",
        }
    }
}

/// Parse a vocabulary entry
///
/// Snippets are kept as templates. Abbreviations that look like a tag become
/// elements, anything else is a reference to another abbreviation. Unescaped
/// `|` marks the caret in both.
pub fn parse_item(value: &str, kind: ItemKind) -> Resource {
    let value = normalize_caret(value);
    match kind {
        ItemKind::Snippet => Resource::snippet(value),
        ItemKind::Abbreviation => parse_abbreviation(&value),
    }
}

fn parse_abbreviation(value: &str) -> Resource {
    let Some(caps) = TAG.captures(value) else {
        return Resource::reference(value);
    };
    let name = caps.get(1).map_or("", |m| m.as_str());
    let attrs = caps.get(2).map_or("", |m| m.as_str());
    let is_empty = caps.get(3).is_some_and(|m| m.as_str() == "/");
    Resource::element(name, parse_tag_attributes(attrs), is_empty)
}

fn parse_tag_attributes(attrs: &str) -> Vec<Attribute> {
    TAG_ATTRIBUTE
        .captures_iter(attrs)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Attribute::new(&caps[1], value)
        })
        .collect()
}

/// Replace every unescaped `|` with the caret placeholder
pub fn normalize_caret(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                result.push(ch);
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            '|' => result.push_str(CARET),
            _ => result.push(ch),
        }
    }
    result
}
