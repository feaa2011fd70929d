//! Expanding markup abbreviations (Abbreviation → HTML)

use crate::common::{expand, expander, html};
use insta::assert_snapshot;
use serde_json::json;
use zen_core::{ExpandOptions, Expander, OutputProfile, VocabularyKind};

// ============================================================================
// ELEMENTS
// ============================================================================

#[test]
fn test_element_with_id_and_classes() {
    assert_snapshot!(html("div#main.a.b"), @r#"<div id="main" class="a b">${0}</div>"#);
}

#[test]
fn test_element_with_text() {
    assert_snapshot!(html("p{hello}"), @"<p>hello</p>");
}

#[test]
fn test_vocabulary_attributes() {
    assert_snapshot!(html("a"), @r#"<a href="${1}">${2}</a>"#);
}

#[test]
fn test_unary_element() {
    assert_eq!(html("br"), "<br>");
    assert_eq!(expand("br", "xml"), "<br/>");
}

// ============================================================================
// STRUCTURE
// ============================================================================

#[test]
fn test_siblings_and_children() {
    assert_eq!(html("div+p"), "<div>${1}</div>\n<p>${2}</p>");
    assert_eq!(html("ul>li*2"), "<ul>\n\t<li>${1}</li>\n\t<li>${2}</li>\n</ul>");
}

#[test]
fn test_numbered_classes() {
    assert_eq!(
        html("ul>li.item$*3"),
        "<ul>\n\t<li class=\"item1\">${1}</li>\n\t<li class=\"item2\">${2}</li>\n\t<li class=\"item3\">${3}</li>\n</ul>"
    );
}

#[test]
fn test_reference_expansion() {
    assert_eq!(html("ol+"), "<ol>\n\t<li>${0}</li>\n</ol>");
}

#[test]
fn test_html5_document() {
    let out = html("html:5");
    assert!(out.starts_with("<!doctype html>"));
    assert!(out.contains("<html lang=\"en\">"));
    assert!(out.contains("<meta charset=\"UTF-8\">"));
    assert!(out.trim_end().ends_with("</html>"));

    let extracted = expander()
        .extract("html:5", &ExpandOptions::default())
        .unwrap();
    assert!(extracted.text.contains("<title>Document</title>"));
}

// ============================================================================
// PROFILES AND FILTERS
// ============================================================================

#[test]
fn test_ad_hoc_profile() {
    let profile = OutputProfile {
        tag_case: zen_core::profile::Case::Upper,
        ..Default::default()
    };
    let options = ExpandOptions::default().with_profile(profile);
    let out = expander().expand("p", &options).unwrap();
    assert_eq!(out, "<P>${0}</P>");
}

#[test]
fn test_escape_filter_suffix() {
    assert_snapshot!(html("p|e"), @"&lt;p&gt;${0}&lt;/p&gt;");
}

#[test]
fn test_haml_syntax() {
    assert_eq!(expand("div>p", "haml"), "%div \n\t%p ${0}");
}

#[test]
fn test_unknown_syntax_uses_plain_profile() {
    assert_eq!(expand("div", "plain-text"), "<div></div>");
}

#[test]
fn test_comment_template_keeps_leading_newline() {
    let mut expander = expander();
    expander
        .preferences_mut()
        .set("filter.commentAfter", "\n<!-- end -->")
        .unwrap();
    let out = expander.expand("div#a|c", &ExpandOptions::default()).unwrap();
    assert_eq!(out, "<div id=\"a\">${0}</div>\n<!-- end -->");
}

// ============================================================================
// TABSTOPS
// ============================================================================

fn templated_expander() -> Expander {
    let mut expander = expander();
    expander.resources_mut().set_vocabulary(
        json!({"html": {
            "abbreviations": {"outer": "<x a=\"${1:o}\">"},
            "snippets": {"inner": "${1:foo}", "sig": "${who} and ${who}"}
        }}),
        VocabularyKind::User,
    );
    expander
}

fn groups(expander: &Expander, abbr: &str) -> Vec<usize> {
    let extracted = expander.extract(abbr, &ExpandOptions::default()).unwrap();
    let mut groups: Vec<usize> = extracted.tabstops.iter().map(|t| t.group).collect();
    groups.dedup();
    groups
}

#[test]
fn test_nested_templates_keep_separate_groups() {
    let expander = templated_expander();
    let out = expander.expand("outer>inner", &ExpandOptions::default()).unwrap();
    assert_eq!(out, "<x a=\"${4:o}\">\n\t${9:foo}\n</x>");

    assert_eq!(groups(&expander, "outer>inner+inner"), vec![4, 9, 13]);
}

#[test]
fn test_repeated_variable_shares_one_placeholder() {
    let expander = templated_expander();
    let out = expander.expand("sig", &ExpandOptions::default()).unwrap();
    assert_snapshot!(out, @"${100:who} and ${100:who}");

    let extracted = expander.extract("sig+sig", &ExpandOptions::default()).unwrap();
    assert_eq!(extracted.tabstops.len(), 4);
    assert!(extracted.tabstops.iter().all(|t| t.group == 100));
}
