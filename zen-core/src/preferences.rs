//! User preferences
//!
//! Every preference is declared with [`Preferences::define`], giving it a typed
//! default and a description. Values set afterwards are coerced to the type of
//! the default, so configuration layers can hand in plain strings.

use crate::error::ExpandError;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PreferenceValue {
    /// Parse `raw` into the same variant as `self`. Text is kept verbatim.
    fn coerce(&self, raw: &str) -> PreferenceValue {
        match self {
            PreferenceValue::Bool(_) => PreferenceValue::Bool(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "yes" | "true" | "1"
            )),
            PreferenceValue::Number(_) => {
                PreferenceValue::Number(raw.trim().parse().unwrap_or(0.0))
            }
            PreferenceValue::Text(_) => PreferenceValue::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceValue::Bool(b) => write!(f, "{b}"),
            PreferenceValue::Number(n) => write!(f, "{n}"),
            PreferenceValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PreferenceValue {
    fn from(value: bool) -> Self {
        PreferenceValue::Bool(value)
    }
}

impl From<f64> for PreferenceValue {
    fn from(value: f64) -> Self {
        PreferenceValue::Number(value)
    }
}

impl From<&str> for PreferenceValue {
    fn from(value: &str) -> Self {
        PreferenceValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone)]
struct Preference {
    default: PreferenceValue,
    value: Option<PreferenceValue>,
    description: String,
}

/// One row of [`Preferences::list`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceInfo {
    pub name: String,
    pub value: PreferenceValue,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct Preferences {
    entries: BTreeMap<String, Preference>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preferences used by the built-in filters and profiles
    pub fn with_defaults() -> Self {
        let mut prefs = Self::new();
        crate::profile::define_preferences(&mut prefs);
        crate::filters::define_preferences(&mut prefs);
        prefs
    }

    pub fn define(
        &mut self,
        name: &str,
        default: impl Into<PreferenceValue>,
        description: &str,
    ) {
        self.entries.insert(
            name.to_string(),
            Preference {
                default: default.into(),
                value: None,
                description: description.to_string(),
            },
        );
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Set a value from its string form. Setting the default value clears the override.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), ExpandError> {
        let pref = self
            .entries
            .get_mut(name)
            .ok_or_else(|| ExpandError::UndefinedPreference(name.to_string()))?;
        let value = pref.default.coerce(raw);
        pref.value = (value != pref.default).then_some(value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PreferenceValue> {
        self.entries
            .get(name)
            .map(|p| p.value.as_ref().unwrap_or(&p.default))
    }

    pub fn get_bool(&self, name: &str) -> bool {
        match self.get(name) {
            Some(PreferenceValue::Bool(b)) => *b,
            Some(PreferenceValue::Number(n)) => *n != 0.0,
            Some(PreferenceValue::Text(s)) => !s.is_empty(),
            None => false,
        }
    }

    pub fn get_number(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(PreferenceValue::Number(n)) => *n,
            Some(PreferenceValue::Bool(b)) => f64::from(u8::from(*b)),
            Some(PreferenceValue::Text(s)) => s.trim().parse().unwrap_or(0.0),
            None => 0.0,
        }
    }

    pub fn get_text(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Comma separated value split into trimmed, non-empty items
    pub fn get_array(&self, name: &str) -> Vec<String> {
        self.get_text(name)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// All preferences sorted by name
    pub fn list(&self) -> Vec<PreferenceInfo> {
        self.entries
            .iter()
            .map(|(name, p)| PreferenceInfo {
                name: name.clone(),
                value: p.value.clone().unwrap_or_else(|| p.default.clone()),
                description: p.description.clone(),
            })
            .collect()
    }

    /// Only the preferences that differ from their default
    pub fn exported(&self) -> BTreeMap<String, PreferenceValue> {
        self.entries
            .iter()
            .filter_map(|(name, p)| p.value.clone().map(|v| (name.clone(), v)))
            .collect()
    }

    /// Drop every override
    pub fn reset(&mut self) {
        for pref in self.entries.values_mut() {
            pref.value = None;
        }
    }
}
