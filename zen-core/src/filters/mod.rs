//! Output filters
//!
//! A filter is a named pass over the parsed tree that fills in or rewrites the
//! `start`, `content` and `end` strings of each node. The filters that run for
//! an expansion are picked per syntax and profile by [`FilterRegistry::compose_list`]
//! and can be extended from the abbreviation itself with a `|name` suffix.
//!
//! Built-in filters:
//!
//! | Name      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `_format` | line breaks and indentation, run implicitly by `html`/`haml` |
//! | `html`    | HTML/XML tags                                            |
//! | `haml`    | HAML lines                                               |
//! | `e`       | escape `<`, `>` and `&`                                  |
//! | `t`       | trim list markers from content                           |
//! | `s`       | collapse output onto a single line                       |
//! | `c`       | comments around elements with `id`/`class`               |
//! | `xsl`     | drop `select` from XSL elements that got children        |

mod comment;
mod escape;
mod format;
mod haml;
mod html;
mod single_line;
mod trim;
mod xsl;

pub use comment::CommentFilter;
pub use escape::EscapeFilter;
pub use format::{format_tree, FormatFilter};
pub use haml::HamlFilter;
pub use html::HtmlFilter;
pub use single_line::SingleLineFilter;
pub use trim::TrimFilter;
pub use xsl::XslFilter;

use crate::error::ExpandError;
use crate::preferences::Preferences;
use crate::profile::OutputProfile;
use crate::resources::Resources;
use crate::tree::AbbreviationTree;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Filter chain used when neither the profile nor the syntax names one
pub const BASIC_FILTERS: &str = "html";

static FILTER_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|([\w|\-]+)$").unwrap());

/// Everything a filter may consult while rewriting the tree
pub struct FilterContext<'a> {
    pub profile: &'a OutputProfile,
    pub preferences: &'a Preferences,
    pub resources: &'a Resources,
    pub syntax: &'a str,
}

impl FilterContext<'_> {
    /// One level of indentation for this syntax
    pub fn indentation(&self) -> String {
        self.resources
            .get_variable(self.syntax, "indentation")
            .unwrap_or_else(|| "\t".to_string())
    }
}

/// A named tree rewrite
pub trait Filter: Send + Sync {
    /// Name used in filter chains (lowercase)
    fn name(&self) -> &str;

    /// One-line summary for listings
    fn description(&self) -> &str;

    fn apply(&self, tree: &mut AbbreviationTree, ctx: &FilterContext) -> Result<(), ExpandError>;
}

/// Registry of output filters
///
/// Filters are registered and retrieved by name.
///
/// # Examples
///
/// ```ignore
/// let registry = FilterRegistry::default();
/// let chain = registry.compose_list("html", &profile, &resources, &[]);
/// registry.apply(&mut tree, &chain, &ctx)?;
/// ```
pub struct FilterRegistry {
    filters: HashMap<String, Box<dyn Filter>>,
}

impl FilterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FilterRegistry {
            filters: HashMap::new(),
        }
    }

    /// Register a filter
    ///
    /// If a filter with the same name already exists, it will be replaced.
    pub fn register<F: Filter + 'static>(&mut self, filter: F) {
        self.filters
            .insert(filter.name().to_lowercase(), Box::new(filter));
    }

    /// Get a filter by name
    pub fn get(&self, name: &str) -> Option<&dyn Filter> {
        self.filters
            .get(&name.trim().to_lowercase())
            .map(|f| f.as_ref())
    }

    /// Check if a filter exists
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// List all registered filter names (sorted)
    pub fn list_filters(&self) -> Vec<String> {
        let mut names: Vec<_> = self.filters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Default chain for `syntax`: the profile's `filters`, else the syntax
    /// `filters` item, else [`BASIC_FILTERS`]; then the profile's
    /// `extra_filters` and finally `additional`
    pub fn compose_list(
        &self,
        syntax: &str,
        profile: &OutputProfile,
        resources: &Resources,
        additional: &[String],
    ) -> Vec<String> {
        let base = if !profile.filters.trim().is_empty() {
            profile.filters.clone()
        } else {
            resources
                .find_item(syntax, "filters")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| BASIC_FILTERS.to_string())
        };

        let mut list = split_list(&base);
        list.extend(split_list(&profile.extra_filters));
        list.extend(additional.iter().flat_map(|f| split_list(f)));
        if list.is_empty() {
            list = split_list(BASIC_FILTERS);
        }
        list
    }

    /// Run `names` in order. Unknown names are skipped.
    pub fn apply(
        &self,
        tree: &mut AbbreviationTree,
        names: &[String],
        ctx: &FilterContext,
    ) -> Result<(), ExpandError> {
        for name in names {
            match self.get(name) {
                Some(filter) => {
                    trace!(filter = %name, "applying filter");
                    filter.apply(tree, ctx)?;
                }
                None => debug!(filter = %name, "unknown filter skipped"),
            }
        }
        Ok(())
    }

    /// Create a registry with the built-in filters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(FormatFilter);
        registry.register(HtmlFilter);
        registry.register(HamlFilter);
        registry.register(EscapeFilter);
        registry.register(TrimFilter);
        registry.register(SingleLineFilter);
        registry.register(CommentFilter);
        registry.register(XslFilter);

        registry
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Split a `|` or `,` separated chain into trimmed lowercase names
pub fn split_list(filters: &str) -> Vec<String> {
    filters
        .split(['|', ','])
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty())
        .collect()
}

/// Separate a trailing `|filter|filter` suffix from an abbreviation
pub fn extract_from_abbreviation(abbr: &str) -> (String, Vec<String>) {
    match FILTER_SUFFIX.captures(abbr) {
        Some(caps) => {
            let whole = caps.get(0).map_or(abbr.len(), |m| m.start());
            let names = caps.get(1).map_or("", |m| m.as_str());
            (abbr[..whole].to_string(), split_list(names))
        }
        None => (abbr.to_string(), Vec::new()),
    }
}

pub(crate) fn define_preferences(prefs: &mut Preferences) {
    comment::define_preferences(prefs);
    trim::define_preferences(prefs);
    format::define_preferences(prefs);
}
