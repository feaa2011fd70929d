//! Shared configuration loader for the zen toolchain.
//!
//! `defaults/zen.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ZenConfig`],
//! then hand the result to an [`Expander`] with [`ZenConfig::apply`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use zen_core::{ExpandError, ExpandOptions, Expander, OutputProfile, VocabularyKind};

const DEFAULT_TOML: &str = include_str!("../defaults/zen.default.toml");

/// Errors raised while loading or applying configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid vocabulary in {}: {source}", .path.display())]
    Vocabulary {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Expand(#[from] ExpandError),
}

/// Top-level configuration consumed by zen applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ZenConfig {
    pub expand: ExpandConfig,
    /// `group -> name -> value`, applied as the `group.name` preference
    #[serde(default)]
    pub preferences: BTreeMap<String, BTreeMap<String, PreferenceSetting>>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, OutputProfile>,
}

/// Defaults for every expansion.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpandConfig {
    pub syntax: String,
    pub profile: String,
    pub insert_final_tabstop: bool,
    #[serde(default)]
    pub snippets: Option<PathBuf>,
}

/// A preference value as written in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PreferenceSetting {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for PreferenceSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceSetting::Bool(b) => write!(f, "{b}"),
            PreferenceSetting::Number(n) => write!(f, "{n}"),
            PreferenceSetting::Text(s) => f.write_str(s),
        }
    }
}

impl ZenConfig {
    /// Expansion options carrying the configured defaults.
    pub fn expand_options(&self) -> ExpandOptions {
        let mut options = ExpandOptions::for_syntax(&self.expand.syntax);
        if !self.expand.profile.is_empty() {
            options = options.with_profile(self.expand.profile.as_str());
        }
        options.insert_final_tabstop = self.expand.insert_final_tabstop;
        options
    }

    /// Load the user vocabulary, then apply variables, preferences and profiles.
    pub fn apply(&self, expander: &mut Expander) -> Result<(), ConfigLoadError> {
        if let Some(path) = &self.expand.snippets {
            load_vocabulary(expander, path)?;
        }

        for (name, value) in &self.variables {
            expander.resources_mut().set_variable(name, value);
        }

        for (group, entries) in &self.preferences {
            for (name, value) in entries {
                let key = preference_name(expander, group, name);
                debug!(preference = %key, value = %value, "applying preference");
                expander.preferences_mut().set(&key, &value.to_string())?;
            }
        }

        for (name, profile) in &self.profiles {
            expander.profiles_mut().create(name, profile.clone());
        }
        Ok(())
    }
}

/// Read a JSON vocabulary file into the user tier of `expander`.
pub fn load_vocabulary(expander: &mut Expander, path: &Path) -> Result<(), ConfigLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data = serde_json::from_str(&text).map_err(|source| ConfigLoadError::Vocabulary {
        path: path.to_path_buf(),
        source,
    })?;
    expander
        .resources_mut()
        .set_vocabulary(data, VocabularyKind::User);
    Ok(())
}

/// Registered preference matching `group.name` regardless of case, or the
/// literal key when nothing matches.
fn preference_name(expander: &Expander, group: &str, name: &str) -> String {
    let key = format!("{group}.{name}");
    expander
        .preferences()
        .list()
        .into_iter()
        .map(|info| info.name)
        .find(|defined| defined.eq_ignore_ascii_case(&key))
        .unwrap_or(key)
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ZenConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ZenConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zen_core::PreferenceValue;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.expand.syntax, "html");
        assert!(config.expand.profile.is_empty());
        assert!(!config.expand.insert_final_tabstop);
        assert!(config.expand.snippets.is_none());
        assert!(config.preferences.is_empty());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("expand.syntax", "css")
            .expect("override to apply")
            .set_override("expand.insert_final_tabstop", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        let options = config.expand_options();
        assert_eq!(options.syntax, "css");
        assert!(options.insert_final_tabstop);
        assert!(options.profile.is_none());
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/definitely/not/here.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn optional_file_may_be_absent() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here.toml")
            .build()
            .expect("defaults to deserialize");
        assert_eq!(config.expand.syntax, "html");
    }

    #[test]
    fn applies_file_onto_expander() {
        let file = toml_file(
            r#"
[expand]
profile = "compact"

[preferences.filter]
commentTrigger = "id"

[variables]
lang = "de"

[profiles.compact]
tag_case = "upper"
self_closing_tag = false
"#,
        );
        let config = Loader::new().with_file(file.path()).build().unwrap();
        let mut expander = Expander::with_defaults().unwrap();
        config.apply(&mut expander).unwrap();

        assert_eq!(
            expander.preferences().get("filter.commentTrigger"),
            Some(&PreferenceValue::Text("id".into()))
        );
        assert_eq!(expander.resources().variable("lang").as_deref(), Some("de"));
        assert!(expander.profiles().has("compact"));

        let out = expander.expand("br", &config.expand_options()).unwrap();
        assert_eq!(out, "<BR>");
    }

    #[test]
    fn unknown_preference_is_an_error() {
        let file = toml_file("[preferences.filter]\nnope = 1\n");
        let config = Loader::new().with_file(file.path()).build().unwrap();
        let mut expander = Expander::with_defaults().unwrap();
        let err = config.apply(&mut expander).unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Expand(ExpandError::UndefinedPreference(_))
        ));
    }

    #[test]
    fn loads_user_vocabulary() {
        let mut vocabulary = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        vocabulary
            .write_all(br#"{"html": {"snippets": {"hi": "hello"}}}"#)
            .unwrap();
        let mut expander = Expander::with_defaults().unwrap();
        load_vocabulary(&mut expander, vocabulary.path()).unwrap();
        let out = expander.expand("hi", &ExpandOptions::default()).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn broken_vocabulary_names_the_file() {
        let mut vocabulary = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        vocabulary.write_all(b"{ not json").unwrap();
        let mut expander = Expander::with_defaults().unwrap();
        let err = load_vocabulary(&mut expander, vocabulary.path()).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Vocabulary { .. }));
    }
}
