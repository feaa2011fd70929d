//! Wrapping existing text with an abbreviation

use crate::common::expander;
use zen_core::ExpandOptions;

fn wrap(abbr: &str, text: &str) -> String {
    expander()
        .wrap(abbr, text, &ExpandOptions::default())
        .unwrap()
}

#[test]
fn test_lines_go_to_repeated_nodes() {
    assert_eq!(
        wrap("ul>li*", "first\nsecond"),
        "<ul>\n\t<li>first</li>\n\t<li>second</li>\n</ul>"
    );
}

#[test]
fn test_common_indentation_is_removed() {
    assert_eq!(
        wrap("ol>li*", "    a\n    b\n"),
        "<ol>\n\t<li>a</li>\n\t<li>b</li>\n</ol>"
    );
}

#[test]
fn test_whole_text_without_repeat() {
    assert_eq!(wrap("div>p", "hello"), "<div>\n\t<p>hello</p>\n</div>");
}

#[test]
fn test_output_placeholder() {
    assert_eq!(
        wrap("ul>li*>a[href=$#]", "x"),
        "<ul>\n\t<li><a href=\"x\">${0}</a></li>\n</ul>"
    );
}

#[test]
fn test_dollar_signs_are_escaped() {
    let out = wrap("p", "cost $5");
    assert_eq!(out, "<p>cost \\$5</p>");
}
