//! Error types for abbreviation expansion

/// Errors that can occur while parsing or expanding an abbreviation
///
/// Grammar errors abort the whole expansion. Resource and filter problems never
/// surface here: an unknown filter is skipped and an unresolvable or cyclic
/// resource leaves the node in its literal form.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// A term failed the element name check or holds a character the grammar rejects
    #[error("Malformed abbreviation at character {position}: {message}")]
    MalformedAbbreviation { position: usize, message: String },

    /// No closing pair for `(`, `[`, `{` or a quoted attribute value
    #[error("Unbalanced delimiter: no matching \"{delimiter}\" found for character at {position}")]
    UnbalancedDelimiter { delimiter: char, position: usize },

    /// A `*N` multiplier asks for more copies than `MAX_REPEAT_COUNT`
    #[error("Repeat count {count} at character {position} exceeds the limit of {}", crate::tree::MAX_REPEAT_COUNT)]
    RepeatLimit { count: String, position: usize },

    /// The parser iteration cap was exceeded
    #[error("Parser loop limit exceeded")]
    InternalParserLoop,

    /// Preference was never registered with `Preferences::define`
    #[error("Preference '{0}' is not defined")]
    UndefinedPreference(String),

    /// A vocabulary document could not be decoded
    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(#[from] serde_json::Error),

    /// A regular expression held in a preference does not compile
    #[error("Invalid pattern in preference '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

impl ExpandError {
    pub(crate) fn malformed(position: usize, message: impl Into<String>) -> Self {
        ExpandError::MalformedAbbreviation {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn unbalanced(delimiter: char, position: usize) -> Self {
        ExpandError::UnbalancedDelimiter {
            delimiter,
            position,
        }
    }
}
