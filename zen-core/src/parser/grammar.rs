//! Abbreviation grammar
//!
//! ```text
//! abbr       := term (op term)*
//! op         := '>' | '+' | '^'
//! term       := group | element
//! group      := '(' abbr ')' multiplier?
//! element    := name? attrs? text? multiplier?
//! multiplier := '*' digits?
//! ```
//!
//! The scan keeps a `context` cursor on the node being filled. `>` descends
//! into a new child, `+` adds a sibling and `^` adds a node one level above the
//! current parent. A group is parsed on its own and its children are moved
//! under the current context; the trailing multiplier repeats the context.

use super::term::set_abbreviation;
use crate::error::ExpandError;
use crate::scanner::{char_index, Scanner};
use crate::tree::{AbbreviationTree, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;

const LOOP_LIMIT: usize = 1000;

static GROUP_MULTIPLIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*([0-9]+)?").unwrap());

fn is_allowed_char(ch: char) -> bool {
    ch.is_alphanumeric() || "#.*:$-_!@|%".contains(ch)
}

/// Parse `abbr` into a fresh tree
pub fn parse_abbreviation(abbr: &str) -> Result<AbbreviationTree, ExpandError> {
    let mut tree = AbbreviationTree::new();
    let root = tree.root();
    parse_into(&mut tree, root, abbr)?;
    Ok(tree)
}

/// Parse `abbr` and append the resulting nodes to `root`
pub fn parse_into(
    tree: &mut AbbreviationTree,
    root: NodeId,
    abbr: &str,
) -> Result<(), ExpandError> {
    let trimmed = abbr.trim_start();
    let base = char_index(abbr, abbr.len() - trimmed.len());
    parse_at(tree, root, trimmed.trim_end(), base)
}

fn parse_at(
    tree: &mut AbbreviationTree,
    root: NodeId,
    abbr: &str,
    base: usize,
) -> Result<(), ExpandError> {
    let position = |offset: usize| base + char_index(abbr, offset);
    let mut scanner = Scanner::new(abbr);
    let mut context = tree.add_new_child(root);
    // Each group gets its own budget
    let mut budget = LOOP_LIMIT;

    while let Some(ch) = scanner.peek() {
        budget = budget.checked_sub(1).ok_or(ExpandError::InternalParserLoop)?;

        match ch {
            '(' => {
                let open = scanner.pos;
                if !scanner.skip_to_pair('(', ')', false) {
                    return Err(ExpandError::unbalanced(')', position(open)));
                }
                let inner = &abbr[open + 1..scanner.pos - 1];
                let group = tree.create_node();
                parse_at(tree, group, inner, position(open + 1))?;

                if let Some(caps) = scanner.match_regex(&GROUP_MULTIPLIER, true) {
                    tree.node_mut(context)
                        .set_repeat(caps.get(1).map(|m| m.as_str()), position(open))?;
                }
                for child in tree.children(group).to_vec() {
                    tree.insert_child(context, child, None);
                }
            }
            '>' => {
                scanner.next();
                context = tree.add_new_child(context);
            }
            '+' => {
                scanner.next();
                let parent = tree.parent(context).unwrap_or(root);
                context = tree.add_new_child(parent);
            }
            '^' => {
                scanner.next();
                let parent = tree.parent(context).unwrap_or(context);
                let target = tree.parent(parent).unwrap_or(parent);
                context = tree.add_new_child(target);
            }
            _ => {
                let start = scanner.pos;
                consume_term(&mut scanner, &position)?;
                if scanner.pos == start {
                    return Err(ExpandError::malformed(
                        position(start),
                        format!("unexpected character '{ch}'"),
                    ));
                }
                set_abbreviation(
                    tree.node_mut(context),
                    &abbr[start..scanner.pos],
                    position(start),
                )?;
            }
        }
    }

    Ok(())
}

/// Advance over one term. Attribute sets and text are skipped as a whole; a
/// `+` belongs to the term only when it ends the abbreviation or precedes
/// another operator (`ul+`, `ol+>li`).
fn consume_term(scanner: &mut Scanner, position: &impl Fn(usize) -> usize) -> Result<(), ExpandError> {
    while let Some(ch) = scanner.peek() {
        match ch {
            '[' | '{' => {
                let open = scanner.pos;
                let (close, skip_quoted) = if ch == '[' { (']', true) } else { ('}', false) };
                if !scanner.skip_to_pair(ch, close, skip_quoted) {
                    return Err(ExpandError::unbalanced(close, position(open)));
                }
            }
            '+' => {
                let is_marker = scanner.rest()[1..]
                    .chars()
                    .next()
                    .map_or(true, |next| "+>^*".contains(next));
                if !is_marker {
                    break;
                }
                scanner.next();
            }
            '(' => break,
            c if is_allowed_char(c) => {
                scanner.next();
            }
            _ => break,
        }
    }
    Ok(())
}
