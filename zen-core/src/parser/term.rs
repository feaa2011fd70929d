//! A single operator-delimited term: `name#id.class[attrs]{text}*N`

use crate::error::ExpandError;
use crate::scanner::{char_index, Scanner};
use crate::tree::{optimize_attributes, AbbreviationNode, Attribute};
use once_cell::sync::Lazy;
use regex::Regex;

static MULTIPLIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([0-9]+)?$").unwrap());
static VALID_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\-$:@!%]+\+?$").unwrap());

/// Characters allowed in attribute names and in `#id`/`.class` shorthands
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | ':' | '$' | '@')
}

/// Parsed pieces of a term
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Term {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub text: Option<String>,
    /// `Some(Some(n))` for `*n`, `Some(None)` for a bare `*`
    pub repeat: Option<Option<String>>,
}

/// Maps byte offsets inside a term back to character positions of the whole
/// abbreviation, accounting for the `{text}` cut out of the term
struct Positions<'a> {
    term: &'a str,
    base: usize,
    removed: Option<(usize, usize)>,
}

impl Positions<'_> {
    fn at(&self, offset: usize) -> usize {
        let offset = match self.removed {
            Some((start, len)) if offset >= start => offset + len,
            _ => offset,
        };
        self.base + char_index(self.term, offset)
    }
}

/// Fill `node` from the term text. `base` is the character position of the
/// term within the whole abbreviation.
pub fn set_abbreviation(
    node: &mut AbbreviationNode,
    abbr: &str,
    base: usize,
) -> Result<(), ExpandError> {
    let term = parse_term(abbr, base)?;
    node.abbreviation = abbr.to_string();
    if let Some(repeat) = &term.repeat {
        node.set_repeat(repeat.as_deref(), base)?;
    }
    if let Some(text) = term.text {
        node.content = text.clone();
        node.text = text;
    }
    node.name = term.name;
    node.attributes = term.attributes;
    Ok(())
}

pub fn parse_term(abbr: &str, base: usize) -> Result<Term, ExpandError> {
    let mut positions = Positions {
        term: abbr,
        base,
        removed: None,
    };

    let (mut element, text) = match extract_text(abbr, &positions)? {
        Some((start, end)) => {
            positions.removed = Some((start, end - start));
            let element = format!("{}{}", &abbr[..start], &abbr[end..]);
            (element, Some(abbr[start + 1..end - 1].to_string()))
        }
        None => (abbr.to_string(), None),
    };

    let mut repeat = None;
    if let Some(caps) = MULTIPLIER.captures(&element) {
        let at = caps.get(0).map_or(element.len(), |m| m.start());
        repeat = Some(caps.get(1).map(|m| m.as_str().to_string()));
        element.truncate(at);
    }

    let (name, attributes) = parse_attributes(&element, &positions)?;
    if !name.is_empty() && !VALID_NAME.is_match(&name) {
        return Err(ExpandError::malformed(
            positions.at(0),
            format!("invalid element name '{name}'"),
        ));
    }

    Ok(Term {
        name,
        attributes,
        text,
        repeat,
    })
}

/// Byte range of the first `{...}` outside an attribute set, braces included
fn extract_text(abbr: &str, positions: &Positions) -> Result<Option<(usize, usize)>, ExpandError> {
    let mut scanner = Scanner::new(abbr);
    while let Some(ch) = scanner.peek() {
        match ch {
            '[' => {
                let open = scanner.pos;
                if !scanner.skip_to_pair('[', ']', true) {
                    return Err(ExpandError::unbalanced(']', positions.at(open)));
                }
            }
            '{' => {
                let open = scanner.pos;
                if !scanner.skip_to_pair('{', '}', false) {
                    return Err(ExpandError::unbalanced('}', positions.at(open)));
                }
                return Ok(Some((open, scanner.pos)));
            }
            _ => {
                scanner.next();
            }
        }
    }
    Ok(None)
}

/// Split `element` into the tag name and its `#id`, `.class` and `[...]` attributes
fn parse_attributes(
    element: &str,
    positions: &Positions,
) -> Result<(String, Vec<Attribute>), ExpandError> {
    let mut scanner = Scanner::new(element);
    let mut name_end = None;
    let mut attributes = Vec::new();

    while let Some(ch) = scanner.peek() {
        match ch {
            '#' | '.' => {
                name_end.get_or_insert(scanner.pos);
                scanner.next();
                scanner.mark();
                scanner.eat_while(is_word_char);
                let name = if ch == '#' { "id" } else { "class" };
                attributes.push(Attribute::new(name, scanner.current()));
            }
            '[' => {
                let open = scanner.pos;
                name_end.get_or_insert(open);
                if !scanner.skip_to_pair('[', ']', true) {
                    return Err(ExpandError::unbalanced(']', positions.at(open)));
                }
                let set = &element[open + 1..scanner.pos - 1];
                attributes.extend(extract_attributes(set, open + 1, positions)?);
            }
            _ => {
                scanner.next();
            }
        }
    }

    let name = element[..name_end.unwrap_or(element.len())].to_string();
    Ok((name, optimize_attributes(attributes)))
}

/// Attributes of a `[...]` set: bare names, `name=value` or quoted values
fn extract_attributes(
    set: &str,
    offset: usize,
    positions: &Positions,
) -> Result<Vec<Attribute>, ExpandError> {
    let mut scanner = Scanner::new(set);
    let mut result = Vec::new();
    scanner.eat_space();

    while !scanner.eol() {
        scanner.mark();
        if !scanner.eat_while(is_word_char) {
            break;
        }
        let name = scanner.current();
        let mut value = String::new();

        if scanner.eat('=').is_some() {
            let value_start = scanner.pos;
            match scanner.peek() {
                Some(quote @ ('"' | '\'')) => {
                    scanner.next();
                    value = consume_quoted(&mut scanner, quote).ok_or_else(|| {
                        ExpandError::unbalanced(quote, positions.at(offset + value_start))
                    })?;
                }
                _ => {
                    scanner.mark();
                    if !scanner.eat_while(|c: char| !c.is_whitespace() && c != ']') {
                        return Err(ExpandError::malformed(
                            positions.at(offset + value_start),
                            format!("missing value for attribute '{name}'"),
                        ));
                    }
                    value = scanner.current().to_string();
                }
            }
        }

        result.push(Attribute::new(name, value));
        scanner.eat_space();
    }

    Ok(result)
}

/// Read up to the closing `quote`, dropping the backslash of escaped quotes
fn consume_quoted(scanner: &mut Scanner, quote: char) -> Option<String> {
    let mut value = String::new();
    while let Some(ch) = scanner.next() {
        if ch == quote {
            return Some(value);
        }
        if ch == '\\' {
            match scanner.next() {
                Some(escaped) if escaped == quote => value.push(escaped),
                Some(escaped) => {
                    value.push('\\');
                    value.push(escaped);
                }
                None => return None,
            }
        } else {
            value.push(ch);
        }
    }
    None
}
