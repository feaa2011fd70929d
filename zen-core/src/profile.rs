//! Output profiles
//!
//! A profile bundles the formatting choices applied by the output filters: tag
//! and attribute case, quoting, self-closing style, line breaks and caret
//! placement. Five profiles are predefined:
//!
//! | Name    | Differences from the defaults                      |
//! |---------|-----------------------------------------------------|
//! | `xhtml` | none                                                |
//! | `html`  | no self-closing slash, compact boolean attributes   |
//! | `xml`   | `<br/>` self-closing, line break around every tag   |
//! | `plain` | no line breaks, no indentation, no caret            |
//! | `line`  | no line breaks, no indentation, adds the `s` filter |
//!
//! A syntax picks its profile through the `profile` item of its vocabulary
//! section; anything unknown falls back to `plain`.

use crate::error::ExpandError;
use crate::preferences::Preferences;
use crate::resources::Resources;
use crate::tabstops::CARET;
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    #[default]
    Asis,
    Upper,
    Lower,
}

impl Case {
    fn apply(self, text: &str) -> String {
        match self {
            Case::Asis => text.to_string(),
            Case::Upper => text.to_uppercase(),
            Case::Lower => text.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quotes {
    Single,
    #[default]
    Double,
}

/// `true`, `false` or a keyword, as written in profile definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Keyword(String),
}

/// Line break policy around tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Flag", into = "Flag")]
pub enum TagNewline {
    /// `true`: break around every tag
    Always,
    /// `false`: never break
    Never,
    /// `"decide"`: break around block elements only
    #[default]
    Decide,
}

impl TryFrom<Flag> for TagNewline {
    type Error = String;

    fn try_from(flag: Flag) -> Result<Self, Self::Error> {
        match flag {
            Flag::Bool(true) => Ok(TagNewline::Always),
            Flag::Bool(false) => Ok(TagNewline::Never),
            Flag::Keyword(k) if k.eq_ignore_ascii_case("decide") => Ok(TagNewline::Decide),
            Flag::Keyword(k) => Err(format!("invalid tag_nl value '{k}'")),
        }
    }
}

impl From<TagNewline> for Flag {
    fn from(value: TagNewline) -> Self {
        match value {
            TagNewline::Always => Flag::Bool(true),
            TagNewline::Never => Flag::Bool(false),
            TagNewline::Decide => Flag::Keyword("decide".into()),
        }
    }
}

/// How empty elements are closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Flag", into = "Flag")]
pub enum SelfClosing {
    /// `"xhtml"`: `<br />`
    #[default]
    Xhtml,
    /// `true`: `<br/>`
    Xml,
    /// `false`: `<br>`
    Html,
}

impl TryFrom<Flag> for SelfClosing {
    type Error = String;

    fn try_from(flag: Flag) -> Result<Self, Self::Error> {
        match flag {
            Flag::Bool(true) => Ok(SelfClosing::Xml),
            Flag::Bool(false) => Ok(SelfClosing::Html),
            Flag::Keyword(k) if k.eq_ignore_ascii_case("xhtml") => Ok(SelfClosing::Xhtml),
            Flag::Keyword(k) => Err(format!("invalid self_closing_tag value '{k}'")),
        }
    }
}

impl From<SelfClosing> for Flag {
    fn from(value: SelfClosing) -> Self {
        match value {
            SelfClosing::Xml => Flag::Bool(true),
            SelfClosing::Html => Flag::Bool(false),
            SelfClosing::Xhtml => Flag::Keyword("xhtml".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputProfile {
    pub tag_case: Case,
    pub attr_case: Case,
    pub attr_quotes: Quotes,
    pub tag_nl: TagNewline,
    /// With `tag_nl = true`, also break inside elements without children
    pub tag_nl_leaf: bool,
    pub place_cursor: bool,
    pub indent: bool,
    /// Number of adjacent inline siblings that forces line breaks, 0 disables
    pub inline_break: usize,
    pub compact_bool: bool,
    pub self_closing_tag: SelfClosing,
    /// Replaces the syntax filter chain when non-empty
    pub filters: String,
    /// Appended to the filter chain
    pub extra_filters: String,
}

impl Default for OutputProfile {
    fn default() -> Self {
        OutputProfile {
            tag_case: Case::Asis,
            attr_case: Case::Asis,
            attr_quotes: Quotes::Double,
            tag_nl: TagNewline::Decide,
            tag_nl_leaf: false,
            place_cursor: true,
            indent: true,
            inline_break: 3,
            compact_bool: false,
            self_closing_tag: SelfClosing::Xhtml,
            filters: String::new(),
            extra_filters: String::new(),
        }
    }
}

impl OutputProfile {
    pub fn tag_name(&self, name: &str) -> String {
        self.tag_case.apply(name)
    }

    pub fn attribute_name(&self, name: &str) -> String {
        self.attr_case.apply(name)
    }

    pub fn attribute_quote(&self) -> char {
        match self.attr_quotes {
            Quotes::Single => '\'',
            Quotes::Double => '"',
        }
    }

    /// Text placed before `>` of an empty element
    pub fn self_closing(&self) -> &'static str {
        match self.self_closing_tag {
            SelfClosing::Xhtml => " /",
            SelfClosing::Xml => "/",
            SelfClosing::Html => "",
        }
    }

    /// Caret placeholder, empty when the profile does not place one
    pub fn cursor(&self) -> &'static str {
        if self.place_cursor {
            CARET
        } else {
            ""
        }
    }

}

/// Boolean attribute detector built from `profile.booleanAttributes`
#[derive(Debug, Clone)]
pub struct BooleanAttributes {
    pattern: Option<Regex>,
}

impl BooleanAttributes {
    pub fn from_preferences(prefs: &Preferences) -> Result<Self, ExpandError> {
        let pattern = prefs.get_text("profile.booleanAttributes");
        if pattern.is_empty() {
            return Ok(BooleanAttributes { pattern: None });
        }
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ExpandError::InvalidPattern {
                name: "profile.booleanAttributes".into(),
                source,
            })?;
        Ok(BooleanAttributes { pattern: Some(re) })
    }

    /// Whether an attribute is boolean: its value repeats its name, or it has
    /// no value and its name matches the pattern
    pub fn is_boolean(&self, name: &str, value: &str) -> bool {
        if name == value {
            return true;
        }
        match &self.pattern {
            Some(re) if value.is_empty() => re.is_match(name),
            _ => false,
        }
    }
}

/// Either a registered profile name or an ad hoc profile
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileSelector {
    Named(String),
    Custom(OutputProfile),
}

impl From<&str> for ProfileSelector {
    fn from(name: &str) -> Self {
        ProfileSelector::Named(name.to_string())
    }
}

impl From<OutputProfile> for ProfileSelector {
    fn from(profile: OutputProfile) -> Self {
        ProfileSelector::Custom(profile)
    }
}

/// Registry of named profiles
#[derive(Debug, Clone)]
pub struct Profiles {
    profiles: IndexMap<String, OutputProfile>,
}

impl Profiles {
    pub fn new() -> Self {
        Profiles {
            profiles: IndexMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut profiles = Self::new();
        profiles.create("xhtml", OutputProfile::default());
        profiles.create(
            "html",
            OutputProfile {
                self_closing_tag: SelfClosing::Html,
                compact_bool: true,
                ..Default::default()
            },
        );
        profiles.create(
            "xml",
            OutputProfile {
                self_closing_tag: SelfClosing::Xml,
                tag_nl: TagNewline::Always,
                ..Default::default()
            },
        );
        profiles.create(
            "plain",
            OutputProfile {
                tag_nl: TagNewline::Never,
                indent: false,
                place_cursor: false,
                ..Default::default()
            },
        );
        profiles.create(
            "line",
            OutputProfile {
                tag_nl: TagNewline::Never,
                indent: false,
                extra_filters: "s".into(),
                ..Default::default()
            },
        );
        profiles
    }

    /// Register or replace a profile. Names are case-insensitive.
    pub fn create(&mut self, name: &str, profile: OutputProfile) {
        self.profiles.insert(name.to_lowercase(), profile);
    }

    pub fn get(&self, name: &str) -> Option<&OutputProfile> {
        self.profiles.get(&name.to_lowercase())
    }

    pub fn has(&self, name: &str) -> bool {
        self.profiles.contains_key(&name.to_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<OutputProfile> {
        self.profiles.shift_remove(&name.to_lowercase())
    }

    /// Back to the predefined profiles only
    pub fn reset(&mut self) {
        *self = Self::with_defaults();
    }

    pub fn list(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Profile for an expansion: the explicit selector, else the syntax's
    /// `profile` item, else `plain`
    pub fn resolve(
        &self,
        selector: Option<&ProfileSelector>,
        syntax: &str,
        resources: &Resources,
    ) -> OutputProfile {
        let name = match selector {
            Some(ProfileSelector::Custom(profile)) => return profile.clone(),
            Some(ProfileSelector::Named(name)) if !name.is_empty() => Some(name.clone()),
            _ => resources
                .find_item(syntax, "profile")
                .and_then(|v| v.as_str().map(str::to_string)),
        };
        name.and_then(|n| self.get(&n).cloned())
            .or_else(|| self.get("plain").cloned())
            .unwrap_or_else(|| OutputProfile {
                tag_nl: TagNewline::Never,
                indent: false,
                place_cursor: false,
                ..Default::default()
            })
    }
}

impl Default for Profiles {
    fn default() -> Self {
        Self::with_defaults()
    }
}

pub(crate) fn define_preferences(prefs: &mut Preferences) {
    prefs.define(
        "profile.allowCompactBoolean",
        true,
        "Output boolean attributes without a value (`<input checked>`) when the profile has `compact_bool` enabled",
    );
    prefs.define(
        "profile.booleanAttributes",
        "^(?:contenteditable|seamless|async|autofocus|autoplay|checked|controls|defer|disabled|formnovalidate|hidden|ismap|loop|multiple|muted|novalidate|readonly|required|reversed|selected|typemustmatch)$",
        "Case-insensitive regular expression matching attribute names that are boolean when left empty",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predefined_profiles() {
        let profiles = Profiles::with_defaults();
        assert_eq!(profiles.list(), vec!["xhtml", "html", "xml", "plain", "line"]);
        assert_eq!(profiles.get("html").unwrap().self_closing(), "");
        assert_eq!(profiles.get("XML").unwrap().self_closing(), "/");
        assert_eq!(profiles.get("xhtml").unwrap().self_closing(), " /");
        assert_eq!(profiles.get("plain").unwrap().cursor(), "");
        assert_eq!(profiles.get("line").unwrap().extra_filters, "s");
    }

    #[test]
    fn test_case_and_quotes() {
        let profile = OutputProfile {
            tag_case: Case::Upper,
            attr_case: Case::Lower,
            attr_quotes: Quotes::Single,
            ..Default::default()
        };
        assert_eq!(profile.tag_name("div"), "DIV");
        assert_eq!(profile.attribute_name("ID"), "id");
        assert_eq!(profile.attribute_quote(), '\'');
    }

    #[test]
    fn test_boolean_attributes() {
        let prefs = Preferences::with_defaults();
        let booleans = BooleanAttributes::from_preferences(&prefs).unwrap();
        assert!(booleans.is_boolean("checked", ""));
        assert!(booleans.is_boolean("DISABLED", ""));
        assert!(booleans.is_boolean("foo", "foo"));
        assert!(!booleans.is_boolean("checked", "x"));
        assert!(!booleans.is_boolean("title", ""));
    }

    #[test]
    fn test_empty_boolean_pattern() {
        let mut prefs = Preferences::with_defaults();
        prefs.set("profile.booleanAttributes", "").unwrap();
        let booleans = BooleanAttributes::from_preferences(&prefs).unwrap();
        assert!(!booleans.is_boolean("checked", ""));
        assert!(booleans.is_boolean("checked", "checked"));
    }

    #[test]
    fn test_invalid_boolean_pattern() {
        let mut prefs = Preferences::with_defaults();
        prefs.set("profile.booleanAttributes", "(unclosed").unwrap();
        let err = BooleanAttributes::from_preferences(&prefs).unwrap_err();
        assert!(matches!(err, ExpandError::InvalidPattern { .. }));
    }

    #[test]
    fn test_resolve_from_syntax() {
        let mut resources = Resources::new();
        resources.set_vocabulary(
            json!({"html": {"profile": "html"}, "xml": {"extends": "html", "profile": "xml"}}),
            crate::resources::VocabularyKind::System,
        );
        let profiles = Profiles::with_defaults();
        assert_eq!(
            profiles.resolve(None, "xml", &resources).tag_nl,
            TagNewline::Always
        );
        assert_eq!(
            profiles.resolve(Some(&"nonexistent".into()), "xml", &resources),
            profiles.get("plain").cloned().unwrap()
        );
        assert_eq!(profiles.resolve(None, "css", &resources), profiles.get("plain").cloned().unwrap());
    }

    #[test]
    fn test_deserialize_flags() {
        let profile: OutputProfile = serde_json::from_value(json!({
            "tag_nl": true,
            "self_closing_tag": false,
            "tag_case": "upper"
        }))
        .unwrap();
        assert_eq!(profile.tag_nl, TagNewline::Always);
        assert_eq!(profile.self_closing_tag, SelfClosing::Html);
        assert_eq!(profile.tag_case, Case::Upper);
        assert!(profile.place_cursor);

        let profile: OutputProfile =
            serde_json::from_value(json!({"tag_nl": "decide", "self_closing_tag": "xhtml"}))
                .unwrap();
        assert_eq!(profile.tag_nl, TagNewline::Decide);
        assert!(serde_json::from_value::<OutputProfile>(json!({"tag_nl": "sometimes"})).is_err());
    }

    #[test]
    fn test_remove_and_reset() {
        let mut profiles = Profiles::with_defaults();
        profiles.create("Mine", OutputProfile::default());
        assert!(profiles.has("mine"));
        assert!(profiles.remove("mine").is_some());
        profiles.remove("html");
        profiles.reset();
        assert!(profiles.has("html"));
    }
}
