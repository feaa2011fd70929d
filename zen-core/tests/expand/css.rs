//! Stylesheet snippets

use crate::common::expand;
use insta::assert_snapshot;

#[test]
fn test_property_snippets() {
    assert_snapshot!(expand("m", "css"), @"margin:${0};");
    assert_snapshot!(expand("pos", "css"), @"position:${1:relative};");
}

#[test]
fn test_dashed_names_match_colon_forms() {
    assert_eq!(expand("pos-a", "css"), "position:absolute;");
}

#[test]
fn test_derived_syntax_inherits_snippets() {
    assert_eq!(expand("d:n", "scss"), "display:none;");
}

#[test]
fn test_siblings_get_separate_carets() {
    assert_eq!(expand("m+p", "css"), "margin:${1};\npadding:${2};");
}
