//! Snippet vocabulary
//!
//! The vocabulary is a JSON document keyed by syntax name:
//!
//! ```json
//! {
//!   "variables": { "lang": "en" },
//!   "html": {
//!     "filters": "html",
//!     "profile": "html",
//!     "snippets": { "c": "<!-- |${child} -->" },
//!     "abbreviations": { "a": "<a href=\"\">", "ul+": "ul>li" }
//!   },
//!   "xml": { "extends": "html" }
//! }
//! ```
//!
//! It is held in two tiers. The system tier comes from the embedded
//! `snippets.json`, the user tier from configuration. Reading a section deep
//! merges user over system; merged sections are cached until either tier is
//! replaced. Lookups that miss in a syntax follow its `extends` chain, visiting
//! each syntax at most once.

mod fuzzy;
mod item;
mod vocabulary;

pub use fuzzy::string_score;
pub use item::{normalize_caret, parse_item, ItemKind};
pub use vocabulary::{deep_merge, VocabularyKind};

use crate::element::Resource;
use crate::error::ExpandError;
use crate::handlers::HandlerList;
use crate::tree::{AbbreviationTree, NodeId};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace};
use vocabulary::string_entries;

const SYSTEM_VOCABULARY: &str = include_str!("snippets.json");

/// Default minimum score for fuzzy snippet matches
pub const DEFAULT_MIN_SCORE: f64 = 0.3;

const FUZZINESS: f64 = 0.1;

/// Custom lookup consulted before the vocabulary
///
/// Resolvers run highest priority first; the first one to return a resource
/// wins. Any `Fn(&AbbreviationTree, NodeId, &str, &Resources) -> Option<Resource>`
/// closure is a resolver.
pub trait Resolver: Send + Sync {
    fn resolve(
        &self,
        tree: &AbbreviationTree,
        node: NodeId,
        syntax: &str,
        resources: &Resources,
    ) -> Option<Resource>;
}

impl<F> Resolver for F
where
    F: Fn(&AbbreviationTree, NodeId, &str, &Resources) -> Option<Resource> + Send + Sync,
{
    fn resolve(
        &self,
        tree: &AbbreviationTree,
        node: NodeId,
        syntax: &str,
        resources: &Resources,
    ) -> Option<Resource> {
        self(tree, node, syntax, resources)
    }
}

/// Resolver that falls back to the closest snippet name
pub struct FuzzyResolver {
    pub min_score: f64,
}

impl Resolver for FuzzyResolver {
    fn resolve(
        &self,
        tree: &AbbreviationTree,
        node: NodeId,
        syntax: &str,
        resources: &Resources,
    ) -> Option<Resource> {
        let name = &tree.node(node).name;
        if name.is_empty() {
            return None;
        }
        resources
            .find_snippet(syntax, name)
            .or_else(|| resources.fuzzy_find_snippet(syntax, name, self.min_score))
    }
}

/// A snippet or abbreviation visible from a syntax
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetEntry {
    pub name: String,
    /// Name with `:` turned into `-` and a trailing `:` dropped
    pub normalized: String,
    pub value: String,
    pub kind: ItemKind,
    /// Syntax section that defines the entry
    pub syntax: String,
    pub resource: Resource,
}

/// A fuzzy match candidate with its score
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub score: f64,
    pub entry: SnippetEntry,
}

pub struct Resources {
    system: Value,
    user: Value,
    sections: Mutex<HashMap<String, Arc<Value>>>,
    all_snippets: Mutex<HashMap<String, Arc<IndexMap<String, SnippetEntry>>>>,
    resolvers: HandlerList<Box<dyn Resolver>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn normalize_name(name: &str) -> String {
    name.strip_suffix(':').unwrap_or(name).replace(':', "-")
}

impl Resources {
    /// Empty vocabulary
    pub fn new() -> Self {
        Resources {
            system: Value::Object(Default::default()),
            user: Value::Object(Default::default()),
            sections: Mutex::new(HashMap::new()),
            all_snippets: Mutex::new(HashMap::new()),
            resolvers: HandlerList::new(),
        }
    }

    /// Vocabulary seeded with the embedded system definitions
    pub fn with_defaults() -> Result<Self, ExpandError> {
        let mut resources = Self::new();
        resources.set_vocabulary(serde_json::from_str(SYSTEM_VOCABULARY)?, VocabularyKind::System);
        Ok(resources)
    }

    /// Replace one tier and drop every cached section
    pub fn set_vocabulary(&mut self, data: Value, kind: VocabularyKind) {
        match kind {
            VocabularyKind::System => self.system = data,
            VocabularyKind::User => self.user = data,
        }
        self.invalidate();
    }

    /// Parse `json` and use it as the given tier
    pub fn load_vocabulary(&mut self, json: &str, kind: VocabularyKind) -> Result<(), ExpandError> {
        self.set_vocabulary(serde_json::from_str(json)?, kind);
        Ok(())
    }

    pub fn vocabulary(&self, kind: VocabularyKind) -> &Value {
        match kind {
            VocabularyKind::System => &self.system,
            VocabularyKind::User => &self.user,
        }
    }

    fn invalidate(&self) {
        lock(&self.sections).clear();
        lock(&self.all_snippets).clear();
    }

    pub fn has_syntax(&self, syntax: &str) -> bool {
        self.system.get(syntax).is_some() || self.user.get(syntax).is_some()
    }

    /// Names of every syntax section, global `variables` excluded
    pub fn syntaxes(&self) -> Vec<String> {
        let mut names: Vec<String> = [&self.system, &self.user]
            .iter()
            .filter_map(|v| v.as_object())
            .flat_map(|map| map.keys().cloned())
            .filter(|name| name != "variables")
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// User tier deep merged over the system tier for `name`
    pub fn section(&self, name: &str) -> Option<Arc<Value>> {
        if name.is_empty() {
            return None;
        }
        let mut cache = lock(&self.sections);
        if let Some(section) = cache.get(name) {
            return Some(section.clone());
        }
        let system = self.system.get(name);
        let user = self.user.get(name);
        let mut merged = Value::Object(Default::default());
        if let Some(system) = system {
            deep_merge(&mut merged, system);
        }
        if let Some(user) = user {
            deep_merge(&mut merged, user);
        }
        let merged = Arc::new(merged);
        // Unknown names are not cached
        if system.is_some() || user.is_some() {
            cache.insert(name.to_string(), merged.clone());
        }
        Some(merged)
    }

    /// Chain of syntax names starting at `syntax` and following `extends`
    fn chain(&self, syntax: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        let mut current = Some(syntax.to_string());
        while let Some(name) = current.take() {
            if name.is_empty() {
                break;
            }
            if chain.contains(&name) {
                debug!(syntax, repeated = %name, "extends cycle cut");
                break;
            }
            current = self
                .section(&name)
                .and_then(|s| s.get("extends").and_then(Value::as_str).map(str::to_string));
            chain.push(name);
        }
        chain
    }

    /// Value of `item` in `syntax`, or in the first ancestor that defines it
    pub fn find_item(&self, syntax: &str, item: &str) -> Option<Value> {
        self.chain(syntax)
            .iter()
            .filter_map(|name| self.section(name))
            .find_map(|section| section.get(item).cloned())
    }

    /// Global vocabulary variable
    pub fn variable(&self, name: &str) -> Option<String> {
        self.section("variables")?
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Variable defined in the `variables` of `syntax` or its ancestors,
    /// falling back to the global variables
    pub fn get_variable(&self, syntax: &str, name: &str) -> Option<String> {
        self.chain(syntax)
            .iter()
            .filter_map(|s| self.section(s))
            .find_map(|section| {
                section
                    .get("variables")
                    .and_then(|v| v.get(name))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .or_else(|| self.variable(name))
    }

    /// Set a global variable in the user tier
    pub fn set_variable(&mut self, name: &str, value: &str) {
        if !self.user.is_object() {
            self.user = Value::Object(Default::default());
        }
        if let Some(user) = self.user.as_object_mut() {
            let variables = user
                .entry("variables")
                .or_insert_with(|| Value::Object(Default::default()));
            if !variables.is_object() {
                *variables = Value::Object(Default::default());
            }
            if let Some(map) = variables.as_object_mut() {
                map.insert(name.to_string(), Value::String(value.to_string()));
            }
        }
        self.invalidate();
    }

    /// Look up `name` in the snippets, then the abbreviations, of `syntax` and
    /// its ancestors. A dashed name also matches its colon form (`pos-a` finds
    /// `pos:a`).
    pub fn find_snippet(&self, syntax: &str, name: &str) -> Option<Resource> {
        if syntax.is_empty() || name.is_empty() {
            return None;
        }
        let mut names = vec![name.to_string()];
        if name.contains('-') {
            names.push(name.replace('-', ":"));
        }
        for section_name in self.chain(syntax) {
            let Some(section) = self.section(&section_name) else {
                continue;
            };
            for kind in [ItemKind::Snippet, ItemKind::Abbreviation] {
                let items = section.get(kind.section());
                for candidate in &names {
                    if let Some(value) = items.and_then(|i| i.get(candidate)).and_then(Value::as_str)
                    {
                        trace!(syntax = %section_name, name = %candidate, "snippet found");
                        return Some(parse_item(value, kind));
                    }
                }
            }
        }
        None
    }

    /// Every snippet and abbreviation visible from `syntax`, keyed by name.
    /// Entries of a syntax override those of its ancestors.
    pub fn all_snippets(&self, syntax: &str) -> Arc<IndexMap<String, SnippetEntry>> {
        if let Some(cached) = lock(&self.all_snippets).get(syntax) {
            return cached.clone();
        }

        let mut all = IndexMap::new();
        for section_name in self.chain(syntax).iter().rev() {
            let Some(section) = self.section(section_name) else {
                continue;
            };
            for kind in [ItemKind::Snippet, ItemKind::Abbreviation] {
                for (name, value) in string_entries(section.get(kind.section())) {
                    all.insert(
                        name.clone(),
                        SnippetEntry {
                            name: name.clone(),
                            normalized: normalize_name(name),
                            value: value.to_string(),
                            kind,
                            syntax: section_name.clone(),
                            resource: parse_item(value, kind),
                        },
                    );
                }
            }
        }

        let all = Arc::new(all);
        if self.has_syntax(syntax) {
            lock(&self.all_snippets).insert(syntax.to_string(), all.clone());
        }
        all
    }

    pub fn has_snippet(&self, syntax: &str, name: &str) -> bool {
        self.find_snippet(syntax, name).is_some()
    }

    /// Candidates scoring at least `min_score` against `name`, best first
    pub fn fuzzy_find_matches(&self, syntax: &str, name: &str, min_score: f64) -> Vec<FuzzyMatch> {
        let query = normalize_name(name);
        let mut matches: Vec<FuzzyMatch> = self
            .all_snippets(syntax)
            .values()
            .map(|entry| FuzzyMatch {
                score: string_score(&entry.normalized, &query, FUZZINESS),
                entry: entry.clone(),
            })
            .filter(|m| m.score >= min_score)
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches
    }

    /// Resource of the best fuzzy match for `name`
    pub fn fuzzy_find_snippet(&self, syntax: &str, name: &str, min_score: f64) -> Option<Resource> {
        let best = self.fuzzy_find_matches(syntax, name, min_score).into_iter().next()?;
        debug!(query = name, matched = %best.entry.name, score = best.score, "fuzzy snippet match");
        Some(best.entry.resource)
    }

    pub fn add_resolver(&mut self, resolver: impl Resolver + 'static, priority: i32) {
        self.resolvers.add(Box::new(resolver), priority);
    }

    pub fn clear_resolvers(&mut self) {
        self.resolvers = HandlerList::new();
    }

    /// Resource for a parsed node: custom resolvers first, then the vocabulary
    pub fn matched_resource(
        &self,
        tree: &AbbreviationTree,
        node: NodeId,
        syntax: &str,
    ) -> Option<Resource> {
        self.resolvers
            .first_match(|resolver| resolver.resolve(tree, node, syntax, self))
            .or_else(|| self.find_snippet(syntax, &tree.node(node).name))
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resources(system: Value) -> Resources {
        let mut resources = Resources::new();
        resources.set_vocabulary(system, VocabularyKind::System);
        resources
    }

    #[test]
    fn test_embedded_vocabulary_loads() {
        let resources = Resources::with_defaults().unwrap();
        assert!(resources.has_syntax("html"));
        assert!(resources.has_syntax("less"));
        assert_eq!(resources.variable("charset").as_deref(), Some("UTF-8"));
        assert!(resources.has_snippet("xml", "ul+"));
    }

    #[test]
    fn test_user_tier_overrides_system() {
        let mut resources = resources(json!({"html": {"snippets": {"a": "sys", "b": "b"}}}));
        assert_eq!(resources.find_snippet("html", "a"), Some(Resource::snippet("sys")));
        resources.set_vocabulary(
            json!({"html": {"snippets": {"a": "user"}}}),
            VocabularyKind::User,
        );
        assert_eq!(resources.find_snippet("html", "a"), Some(Resource::snippet("user")));
        assert_eq!(resources.find_snippet("html", "b"), Some(Resource::snippet("b")));
    }

    #[test]
    fn test_unknown_sections_are_not_cached() {
        let resources = resources(json!({"html": {"snippets": {"a": "a"}}}));
        assert_eq!(resources.section("nope").as_deref(), Some(&json!({})));
        assert_eq!(resources.find_snippet("cobol", "a"), None);
        assert!(resources.section("html").is_some());

        assert!(resources.all_snippets("nope").is_empty());
        assert_eq!(resources.all_snippets("html").len(), 1);

        let cache = lock(&resources.sections);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains_key("html"));
        assert_eq!(lock(&resources.all_snippets).len(), 1);
    }

    #[test]
    fn test_extends_chain() {
        let resources = resources(json!({
            "html": {"snippets": {"a": "from html"}, "filters": "html"},
            "foo": {"extends": "html"},
            "bar": {"extends": "html", "snippets": {"a": "from bar"}}
        }));
        assert_eq!(resources.find_snippet("foo", "a"), Some(Resource::snippet("from html")));
        assert_eq!(resources.find_snippet("bar", "a"), Some(Resource::snippet("from bar")));
        assert_eq!(resources.find_item("foo", "filters"), Some(json!("html")));
    }

    #[test]
    fn test_extends_cycle_terminates() {
        let resources = resources(json!({
            "a": {"extends": "b"},
            "b": {"extends": "a"}
        }));
        assert_eq!(resources.find_snippet("a", "x"), None);
        assert_eq!(resources.find_item("a", "filters"), None);
        assert!(resources.all_snippets("a").is_empty());
    }

    #[test]
    fn test_dash_matches_colon_name() {
        let resources = resources(json!({"css": {"snippets": {"pos:a": "position:absolute;"}}}));
        assert_eq!(
            resources.find_snippet("css", "pos-a"),
            Some(Resource::snippet("position:absolute;"))
        );
    }

    #[test]
    fn test_snippets_before_abbreviations() {
        let resources = resources(json!({"html": {
            "snippets": {"x": "snippet"},
            "abbreviations": {"x": "<x>"}
        }}));
        assert_eq!(resources.find_snippet("html", "x"), Some(Resource::snippet("snippet")));
    }

    #[test]
    fn test_variables() {
        let mut resources = resources(json!({
            "variables": {"lang": "en"},
            "html": {"variables": {"lang": "fr"}},
            "xml": {"extends": "html"}
        }));
        assert_eq!(resources.variable("lang").as_deref(), Some("en"));
        assert_eq!(resources.get_variable("xml", "lang").as_deref(), Some("fr"));
        assert_eq!(resources.get_variable("css", "lang").as_deref(), Some("en"));
        resources.set_variable("lang", "de");
        assert_eq!(resources.variable("lang").as_deref(), Some("de"));
    }

    #[test]
    fn test_all_snippets_flattened() {
        let resources = resources(json!({
            "html": {"snippets": {"a": "1"}, "abbreviations": {"b": "<b>"}},
            "foo": {"extends": "html", "snippets": {"a": "2", "c:": "3"}}
        }));
        let all = resources.all_snippets("foo");
        assert_eq!(all.len(), 3);
        assert_eq!(all["a"].value, "2");
        assert_eq!(all["a"].syntax, "foo");
        assert_eq!(all["b"].kind, ItemKind::Abbreviation);
        assert_eq!(all["c:"].normalized, "c");
    }

    #[test]
    fn test_fuzzy_find() {
        let resources = resources(json!({"html": {"abbreviations": {
            "link": "<link rel=\"stylesheet\" />",
            "script": "<script>",
            "table": "<table>"
        }}}));
        let found = resources.fuzzy_find_snippet("html", "lnk", DEFAULT_MIN_SCORE);
        assert!(matches!(found, Some(Resource::Element(ref e)) if e.name == "link"));
        assert_eq!(resources.fuzzy_find_snippet("html", "zzzz", DEFAULT_MIN_SCORE), None);
    }

    #[test]
    fn test_custom_resolver_runs_first() {
        let mut resources = resources(json!({"html": {"snippets": {"a": "vocab"}}}));
        resources.add_resolver(
            |tree: &AbbreviationTree, node: NodeId, _syntax: &str, _res: &Resources| {
                (tree.node(node).name == "a").then(|| Resource::snippet("custom"))
            },
            0,
        );
        let mut tree = AbbreviationTree::new();
        let root = tree.root();
        let id = tree.add_new_child(root);
        tree.node_mut(id).name = "a".into();
        assert_eq!(
            resources.matched_resource(&tree, id, "html"),
            Some(Resource::snippet("custom"))
        );
    }
}
