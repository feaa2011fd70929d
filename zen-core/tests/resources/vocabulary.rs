//! User vocabulary layered over the embedded one

use crate::common::expander;
use serde_json::json;
use zen_core::{AbbreviationTree, ExpandOptions, NodeId, Resource, Resources, VocabularyKind};

#[test]
fn test_user_snippet_overrides_system() {
    let mut expander = expander();
    expander.resources_mut().set_vocabulary(
        json!({"css": {"snippets": {"m": "margin:${1:0} auto;"}}}),
        VocabularyKind::User,
    );
    let out = expander.expand("m", &ExpandOptions::for_syntax("css")).unwrap();
    assert_eq!(out, "margin:${1:0} auto;");

    // untouched entries still come from the system tier
    let out = expander.expand("p", &ExpandOptions::for_syntax("css")).unwrap();
    assert_eq!(out, "padding:${0};");
}

#[test]
fn test_user_syntax_extends_system_syntax() {
    let mut expander = expander();
    expander
        .resources_mut()
        .load_vocabulary(
            r#"{"vue": {"extends": "html", "abbreviations": {"tpl": "template>div"}}}"#,
            VocabularyKind::User,
        )
        .unwrap();
    let out = expander.expand("tpl", &ExpandOptions::for_syntax("vue")).unwrap();
    assert_eq!(out, "<template>\n\t<div>${0}</div>\n</template>");
    assert!(expander.resources().syntaxes().contains(&"vue".to_string()));
}

#[test]
fn test_variables_fill_snippets() {
    let mut expander = expander();
    expander.resources_mut().set_variable("lang", "fr");
    let out = expander.expand("html:5", &ExpandOptions::default()).unwrap();
    assert!(out.contains("<html lang=\"fr\">"));
}

#[test]
fn test_custom_resolver_runs_first() {
    let mut expander = expander();
    expander.resources_mut().add_resolver(
        |tree: &AbbreviationTree, node: NodeId, _syntax: &str, _res: &Resources| {
            (tree.node(node).name == "hello").then(|| Resource::snippet("Hello, world"))
        },
        0,
    );
    let out = expander.expand("hello", &ExpandOptions::default()).unwrap();
    assert_eq!(out, "Hello, world");
}

#[test]
fn test_snippet_listing_follows_extends() {
    let resources = Resources::with_defaults().unwrap();
    let snippets = resources.all_snippets("scss");
    assert!(snippets.contains_key("m"));
    assert!(snippets.values().any(|entry| entry.syntax == "css"));
}
