//! Repeat counters in output text
//!
//! `$` becomes the node's 1-based counter. A run of `$` zero-pads to the run
//! length, `@-` counts down from the repeat group size and `@N` starts at `N`:
//!
//! ```text
//! item$      -> item1, item2, item3
//! item$$     -> item01, item02, item03
//! item$@-    -> item3, item2, item1
//! item$@5    -> item5, item6, item7
//! item$@-5   -> item7, item6, item5
//! ```
//!
//! Escaped `\$`, tabstops (`$1`, `${...}`) and the `$#` paste marker are left alone.

use crate::handlers::HandlerList;
use crate::render::{OutputPart, OutputProcessor, RenderContext};
use crate::scanner::Scanner;
use crate::tree::{AbbreviationTree, NodeId};
use crate::utils::zero_pad;
use once_cell::sync::Lazy;
use regex::Regex;

static COUNTER_BASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@(-?)(\d*)").unwrap());

/// Substitute counter markers in `text` with `value` out of `total`
pub fn replace_counter(text: &str, value: usize, total: usize) -> String {
    if !text.contains('$') {
        return text.to_string();
    }
    let mut result = String::with_capacity(text.len());
    let mut stream = Scanner::new(text);
    while let Some(ch) = stream.next() {
        if ch == '\\' {
            result.push(ch);
            if let Some(escaped) = stream.next() {
                result.push(escaped);
            }
            continue;
        }
        if ch != '$' {
            result.push(ch);
            continue;
        }
        match stream.peek() {
            Some('{') | Some('#') => {
                result.push(ch);
                continue;
            }
            Some(c) if c.is_ascii_digit() => {
                result.push(ch);
                continue;
            }
            _ => {}
        }

        let mut width = 1;
        while stream.rest().starts_with('$') && !stream.rest()[1..].starts_with('{') {
            stream.next();
            width += 1;
        }

        let mut number = value as i64;
        if let Some(caps) = stream.match_regex(&COUNTER_BASE, true) {
            let descending = !caps[1].is_empty();
            let base = caps[2].parse::<i64>().unwrap_or(1) - 1;
            if descending && total > 0 {
                number = total as i64 - number + 1;
            }
            number += base;
        }
        result.push_str(&zero_pad(number, width));
    }
    result
}

/// Output processor applying [`replace_counter`] with the node's counter
pub struct CounterProcessor;

impl OutputProcessor for CounterProcessor {
    fn name(&self) -> &str {
        "counter"
    }

    fn process(
        &self,
        text: &str,
        tree: &AbbreviationTree,
        node: NodeId,
        _part: OutputPart,
        _ctx: &mut RenderContext,
    ) -> String {
        let node = tree.node(node);
        replace_counter(text, node.counter, node.max_count)
    }
}

pub(crate) fn register(processors: &mut HandlerList<Box<dyn OutputProcessor>>) {
    processors.add(Box::new(CounterProcessor), 10);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_counter() {
        assert_eq!(replace_counter("item$", 2, 3), "item2");
        assert_eq!(replace_counter("no counter", 2, 3), "no counter");
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(replace_counter("item$$$", 7, 10), "item007");
    }

    #[test]
    fn test_descending_and_base() {
        assert_eq!(replace_counter("i$@-", 1, 3), "i3");
        assert_eq!(replace_counter("i$@3", 1, 3), "i3");
        assert_eq!(replace_counter("i$@-5", 1, 3), "i7");
        assert_eq!(replace_counter("i$@-5", 3, 3), "i5");
    }

    #[test]
    fn test_tabstops_and_escapes_untouched() {
        assert_eq!(replace_counter("${1:x} $2 \\$ $#", 4, 5), "${1:x} $2 \\$ $#");
    }

    #[test]
    fn test_run_before_variable_stops() {
        assert_eq!(replace_counter("$${name}", 3, 5), "3${name}");
    }
}
