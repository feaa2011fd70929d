//! Parsing through the full processor pipeline with the embedded vocabulary

use crate::common::{expander, outline};
use zen_core::{Attribute, ContextNode, ExpandError, ExpandOptions};

fn parsed(abbr: &str) -> String {
    let tree = expander().parse(abbr, &ExpandOptions::default()).unwrap();
    outline(&tree, tree.root())
}

#[test]
fn test_repeats_are_unrolled() {
    assert_eq!(parsed("ul>li*3"), "ul[li,li,li]");
}

#[test]
fn test_groups_are_squashed() {
    assert_eq!(parsed("(a+b)*2"), "a,b,a,b");
    assert_eq!(parsed("div>(header+footer)"), "div[header,footer]");
}

#[test]
fn test_climb_up() {
    assert_eq!(parsed("div>p>em^^span"), "div[p[em]],span");
}

#[test]
fn test_references_expand() {
    assert_eq!(parsed("ul+"), "ul[li]");
    assert_eq!(parsed("table+"), "table[tr[td]]");
    assert_eq!(parsed("bq>p"), "blockquote[p]");
}

#[test]
fn test_implicit_names() {
    assert_eq!(parsed("ul>.a"), "ul[li]");
    assert_eq!(parsed("em>.a"), "em[span]");
    assert_eq!(parsed("#main"), "div");
}

#[test]
fn test_counters_follow_unrolling() {
    let tree = expander().parse("li*3", &ExpandOptions::default()).unwrap();
    let counters: Vec<_> = tree
        .children(tree.root())
        .iter()
        .map(|c| tree.node(*c).counter)
        .collect();
    assert_eq!(counters, vec![1, 2, 3]);
}

#[test]
fn test_context_node_drives_tag_names() {
    let options = ExpandOptions {
        context_node: Some(ContextNode {
            name: "ul".into(),
            attributes: vec![Attribute::new("id", "nav")],
        }),
        ..Default::default()
    };
    let tree = expander().parse(".item*2", &options).unwrap();
    assert_eq!(outline(&tree, tree.root()), "li,li");
}

#[test]
fn test_malformed_input_is_reported() {
    let err = expander()
        .parse("div>(p", &ExpandOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ExpandError::UnbalancedDelimiter { delimiter: ')', position: 4 }
    ));
}
