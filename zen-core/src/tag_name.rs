//! Implicit tag names and element classification
//!
//! A node written without a name (`.item`, `#main`) takes its name from the
//! parent: list parents produce `li`, tables produce `tr`, and so on. Anything
//! without a mapping falls back to `span` inside inline parents and `div`
//! everywhere else.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static ELEMENT_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("p", "span"),
        ("ul", "li"),
        ("ol", "li"),
        ("table", "tr"),
        ("tr", "td"),
        ("tbody", "tr"),
        ("thead", "tr"),
        ("tfoot", "tr"),
        ("colgroup", "col"),
        ("select", "option"),
        ("optgroup", "option"),
        ("audio", "source"),
        ("video", "source"),
        ("object", "param"),
        ("map", "area"),
    ])
});

static INLINE_LEVEL: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "a", "abbr", "acronym", "applet", "b", "basefont", "bdo", "big", "br", "button", "cite",
        "code", "del", "dfn", "em", "font", "i", "iframe", "img", "input", "ins", "kbd", "label",
        "map", "object", "q", "s", "samp", "select", "small", "span", "strike", "strong", "sub",
        "sup", "textarea", "tt", "u", "var",
    ])
});

static BLOCK_LEVEL: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "address", "applet", "blockquote", "button", "center", "dd", "del", "dir", "div", "dl",
        "dt", "fieldset", "form", "frameset", "hr", "iframe", "ins", "isindex", "li", "link",
        "map", "menu", "noframes", "noscript", "object", "ol", "p", "pre", "script", "table",
        "tbody", "td", "tfoot", "th", "thead", "tr", "ul", "h1", "h2", "h3", "h4", "h5", "h6",
    ])
});

static EMPTY_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "area", "base", "basefont", "br", "col", "frame", "hr", "img", "input", "isindex",
        "link", "meta", "param", "embed", "keygen", "command",
    ])
});

/// Name for an implicit child of `parent`
pub fn resolve(parent: &str) -> &'static str {
    let parent = parent.to_lowercase();
    if let Some(child) = ELEMENT_MAP.get(parent.as_str()) {
        return child;
    }
    if is_inline_level(&parent) {
        "span"
    } else {
        "div"
    }
}

pub fn is_inline_level(name: &str) -> bool {
    INLINE_LEVEL.contains(name.to_lowercase().as_str())
}

pub fn is_block_level(name: &str) -> bool {
    BLOCK_LEVEL.contains(name.to_lowercase().as_str())
}

/// Void element that never has a closing tag
pub fn is_empty_element(name: &str) -> bool {
    EMPTY_ELEMENTS.contains(name.to_lowercase().as_str())
}

/// Explicit child mapping for `parent`, if any
pub fn mapping(parent: &str) -> Option<&'static str> {
    ELEMENT_MAP.get(parent.to_lowercase().as_str()).copied()
}
