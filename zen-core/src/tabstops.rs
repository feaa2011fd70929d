//! Tabstops, placeholders and variables in output text
//!
//! Recognized tokens:
//!
//! ```text
//! \X              escaped character
//! $N              numbered tabstop
//! ${N}            numbered tabstop
//! ${N:default}    numbered tabstop with a default value, which may nest tokens
//! ${name}         variable
//! ```
//!
//! [`process_text`] walks a string and hands every token to a [`TokenHandler`].
//! A `${` without a matching `}` is copied as literal text.

use crate::handlers::HandlerList;
use crate::render::{OutputPart, OutputProcessor, RenderContext};
use crate::scanner::Scanner;
use crate::tree::{AbbreviationTree, NodeId};
use crate::utils::{line_padding_at, pad_string};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

/// Placeholder marking the final caret position
pub const CARET: &str = "${0}";

/// First index handed out to unresolved variables
const VARIABLE_PLACEHOLDER_START: usize = 100;

static BARE_TABSTOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+").unwrap());
static VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{([a-zA-Z_\-][\w\-]*)\}").unwrap());
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{([0-9]+)(:.+?)?\}").unwrap());

/// A numbered tabstop found in text
#[derive(Debug, Clone, PartialEq)]
pub struct Tabstop<'a> {
    /// Offset of the token in the output produced so far
    pub start: usize,
    pub group: usize,
    pub token: &'a str,
    pub placeholder: Option<&'a str>,
}

/// A `${name}` variable found in text
#[derive(Debug, Clone, PartialEq)]
pub struct Variable<'a> {
    pub start: usize,
    pub name: &'a str,
    pub token: &'a str,
}

/// Replacement strategy for [`process_text`]. Every method defaults to copying
/// the token through unchanged.
pub trait TokenHandler {
    fn escape(&mut self, ch: char) -> String {
        format!("\\{ch}")
    }

    fn tabstop(&mut self, tabstop: &Tabstop) -> String {
        tabstop.token.to_string()
    }

    fn variable(&mut self, variable: &Variable) -> String {
        variable.token.to_string()
    }
}

pub fn process_text(text: &str, handler: &mut impl TokenHandler) -> String {
    let mut buf = String::with_capacity(text.len());
    let mut stream = Scanner::new(text);
    while let Some(ch) = stream.next() {
        if ch == '\\' && !stream.eol() {
            if let Some(escaped) = stream.next() {
                buf.push_str(&handler.escape(escaped));
            }
            continue;
        }
        if ch != '$' {
            buf.push(ch);
            continue;
        }

        stream.start = stream.pos - 1;
        if stream.match_regex(&BARE_TABSTOP, true).is_some() {
            let token = stream.current();
            let tabstop = Tabstop {
                start: buf.len(),
                group: token[1..].parse().unwrap_or(0),
                token,
                placeholder: None,
            };
            let replacement = handler.tabstop(&tabstop);
            buf.push_str(&replacement);
        } else if let Some(caps) = stream.match_regex(&VARIABLE, true) {
            let variable = Variable {
                start: buf.len(),
                name: caps.get(1).map_or("", |m| m.as_str()),
                token: stream.current(),
            };
            let replacement = handler.variable(&variable);
            buf.push_str(&replacement);
        } else if let Some(caps) = stream.match_regex(&PLACEHOLDER, false) {
            let group_text = caps.get(1).map_or("", |m| m.as_str());
            if stream.skip_to_pair('{', '}', false) {
                let token = stream.current();
                let inner = &token[group_text.len() + 2..token.len() - 1];
                let tabstop = Tabstop {
                    start: buf.len(),
                    group: group_text.parse().unwrap_or(0),
                    token,
                    placeholder: inner.strip_prefix(':'),
                };
                let replacement = handler.tabstop(&tabstop);
                buf.push_str(&replacement);
            } else {
                buf.push(ch);
            }
        } else {
            buf.push(ch);
        }
    }
    buf
}

struct VariableReplacer<F> {
    resolve: F,
}

impl<F> TokenHandler for VariableReplacer<F>
where
    F: FnMut(&Variable) -> Option<String>,
{
    fn variable(&mut self, variable: &Variable) -> String {
        (self.resolve)(variable).unwrap_or_else(|| variable.token.to_string())
    }
}

/// Replace `${name}` variables; `None` from `resolve` keeps the token
pub fn replace_variables(
    text: &str,
    resolve: impl FnMut(&Variable) -> Option<String>,
) -> String {
    process_text(text, &mut VariableReplacer { resolve })
}

/// Put `child` at the `${child}` variable of `text`, indented like the line the
/// variable sits on. Without the variable, `child` is appended.
pub fn insert_child_content(text: &str, child: &str, keep_variable: bool) -> String {
    let mut replaced = false;
    let mut result = replace_variables(text, |variable| {
        if variable.name != "child" {
            return None;
        }
        replaced = true;
        let mut output = pad_string(child, line_padding_at(text, variable.start));
        if keep_variable {
            output.push_str(variable.token);
        }
        Some(output)
    });
    if !replaced {
        result.push_str(child);
    }
    result
}

/// Every numbered group used in `text`, nested placeholders included
pub fn groups(text: &str) -> BTreeSet<usize> {
    struct Collector(BTreeSet<usize>);

    impl TokenHandler for Collector {
        fn tabstop(&mut self, tabstop: &Tabstop) -> String {
            self.0.insert(tabstop.group);
            if let Some(placeholder) = tabstop.placeholder {
                process_text(placeholder, self);
            }
            tabstop.token.to_string()
        }
    }

    let mut collector = Collector(BTreeSet::new());
    process_text(text, &mut collector);
    collector.0
}

/// Whether `text` holds any numbered tabstop
pub fn has_tabstops(text: &str) -> bool {
    !groups(text).is_empty()
}

/// Give every `${0}` caret its own index when there is more than one
///
/// The new indices follow the highest group already in use, in order of
/// appearance.
pub fn finalize_carets(text: &str) -> String {
    let carets = text.matches(CARET).count();
    if carets < 2 {
        return text.to_string();
    }
    let mut next = groups(text).iter().max().copied().unwrap_or(0);
    let mut parts = text.split(CARET);
    let mut result = parts.next().unwrap_or_default().to_string();
    for part in parts {
        next += 1;
        result.push_str(&format!("${{{next}}}"));
        result.push_str(part);
    }
    result
}

/// Range of a tabstop in extracted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabstopMark {
    pub group: usize,
    pub start: usize,
    pub end: usize,
}

/// Clean text with tabstop ranges, ready for an editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extracted {
    pub text: String,
    pub tabstops: Vec<TabstopMark>,
}

/// Strip tabstop syntax from `text`
///
/// Every occurrence of a group shows the default value of the first occurrence
/// that defines one. Escapes are removed. Marks are byte ranges into the clean
/// text, sorted by group and then by position.
pub fn extract(text: &str) -> Extracted {
    struct Marker {
        marks: Vec<(usize, usize, usize)>,
        defaults: std::collections::HashMap<usize, String>,
    }

    impl TokenHandler for Marker {
        fn escape(&mut self, ch: char) -> String {
            ch.to_string()
        }

        fn tabstop(&mut self, tabstop: &Tabstop) -> String {
            if let Some(placeholder) = tabstop.placeholder {
                self.defaults
                    .entry(tabstop.group)
                    .or_insert_with(|| extract(placeholder).text);
            }
            self.marks.push((
                tabstop.group,
                tabstop.start,
                tabstop.start + tabstop.token.len(),
            ));
            tabstop.token.to_string()
        }
    }

    let mut marker = Marker {
        marks: Vec::new(),
        defaults: Default::default(),
    };
    let processed = process_text(text, &mut marker);

    let mut clean = String::with_capacity(processed.len());
    let mut last = 0;
    let mut tabstops = Vec::with_capacity(marker.marks.len());
    for (group, start, end) in &marker.marks {
        clean.push_str(&processed[last..*start]);
        let value = marker.defaults.get(group).map_or("", String::as_str);
        let pos = clean.len();
        clean.push_str(value);
        tabstops.push(TabstopMark {
            group: *group,
            start: pos,
            end: pos + value.len(),
        });
        last = *end;
    }
    clean.push_str(&processed[last..]);
    tabstops.sort_by_key(|mark| (mark.group, mark.start));

    Extracted {
        text: clean,
        tabstops,
    }
}

/// Output processor that keeps tabstops of separately rendered templates apart
///
/// Each call shifts the numbered groups in the text by the running
/// `tabstop_index` and then advances it past the highest group seen, so two
/// templates that both use `$1` end up with different indices. The `${0}` caret
/// is never shifted. Variables are resolved afterwards: `${child}` is kept,
/// `${cursor}` becomes the caret, then a node attribute of that name, then a
/// vocabulary variable; anything else becomes a fresh placeholder, shared by
/// every use of the same name within one expansion.
pub struct TabstopProcessor;

struct Renumber {
    offset: usize,
    max_group: usize,
}

impl TokenHandler for Renumber {
    fn tabstop(&mut self, tabstop: &Tabstop) -> String {
        if tabstop.group == 0 {
            return CARET.to_string();
        }
        self.max_group = self.max_group.max(tabstop.group);
        let index = tabstop.group + self.offset;
        match tabstop.placeholder {
            Some(placeholder) => {
                let placeholder = process_text(placeholder, self);
                format!("${{{index}:{placeholder}}}")
            }
            None => format!("${{{index}}}"),
        }
    }
}

impl OutputProcessor for TabstopProcessor {
    fn name(&self) -> &str {
        "tabstops"
    }

    fn process(
        &self,
        text: &str,
        tree: &AbbreviationTree,
        node: NodeId,
        _part: OutputPart,
        ctx: &mut RenderContext,
    ) -> String {
        let mut renumber = Renumber {
            offset: ctx.tabstop_index,
            max_group: 0,
        };
        let text = process_text(text, &mut renumber);

        let text = replace_variables(&text, |variable| {
            resolve_variable(variable, tree, node, ctx)
        });
        ctx.tabstop_index += renumber.max_group + 1;
        text
    }
}

fn resolve_variable(
    variable: &Variable,
    tree: &AbbreviationTree,
    node: NodeId,
    ctx: &mut RenderContext,
) -> Option<String> {
    match variable.name {
        "child" => return None,
        "cursor" => return Some(CARET.to_string()),
        _ => {}
    }
    if let Some(value) = tree.attribute(node, variable.name) {
        if value != variable.token {
            return Some(value);
        }
    }
    if let Some(value) = ctx.resources.get_variable(ctx.syntax, variable.name) {
        return Some(value);
    }
    let next = &mut ctx.next_placeholder;
    let index = *ctx
        .placeholders
        .entry(variable.name.to_string())
        .or_insert_with(|| {
            let index = VARIABLE_PLACEHOLDER_START + *next;
            *next += 1;
            index
        });
    Some(format!("${{{index}:{}}}", variable.name))
}

pub(crate) fn register(processors: &mut HandlerList<Box<dyn OutputProcessor>>) {
    processors.add(Box::new(TabstopProcessor), 0);
}
