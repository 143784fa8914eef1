//! # Error Types

use core::str::Utf8Error;

/// Errors from patternwright operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// A word passed to the synthesizer is not valid UTF-8.
    #[error("invalid UTF-8 in word #{index}: {source}")]
    Encoding {
        /// The position of the offending word in the input list.
        index: usize,

        /// The underlying decode error.
        #[source]
        source: Utf8Error,
    },

    /// The synthesizer was given no words at all.
    #[error("cannot build a pattern from an empty word list")]
    EmptyWordList,

    /// Chain merging recursed deeper than the configured limit.
    #[error("chain merge exceeded the recursion limit ({limit})")]
    RecursionLimit {
        /// The configured limit.
        limit: usize,
    },

    /// The pattern is not of the form `<delim>body<delim>modifiers`.
    #[error("could not parse pattern delimiters: {0}")]
    MalformedDelimiters(String),

    /// A `[` has no matching unescaped `]`.
    #[error("could not find matching bracket from pos {pos}")]
    MalformedCharacterClass {
        /// Byte offset of the `[` in the pattern body.
        pos: usize,
    },

    /// A parenthesis has no partner.
    #[error("unmatched '{unmatched}' at pos {pos}")]
    UnbalancedGroup {
        /// Byte offset of the unmatched parenthesis in the pattern body.
        pos: usize,

        /// Either `(` or `)`.
        unmatched: char,
    },

    /// Groups are nested deeper than the configured limit.
    #[error("group nesting exceeded the depth limit ({limit})")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
    },

    /// A `(?` construct the tokenizer does not know.
    #[error("unsupported subpattern type at pos {pos}")]
    UnsupportedSubpattern {
        /// Byte offset of the `(` in the pattern body.
        pos: usize,
    },

    /// A construct with no equivalent in the target dialect.
    #[error("{0} are not supported")]
    UnsupportedFeature(String),

    /// A non-capturing group carrying inline options, e.g. `(?i:...)`.
    #[error("subpattern options ({options:?}) at pos {pos} are not supported")]
    UnsupportedOptions {
        /// Byte offset of the group in the pattern body.
        pos: usize,

        /// The option letters.
        options: String,
    },
}

impl PatternError {
    /// Is this a gap between the two dialects, rather than a malformed input?
    ///
    /// Best-effort callers (optimizers, pre-compilers) are expected to catch
    /// these and keep the original pattern.
    pub fn is_dialect_gap(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedSubpattern { .. }
                | Self::UnsupportedFeature(_)
                | Self::UnsupportedOptions { .. }
        )
    }
}

/// Result type for patternwright operations.
pub type PWResult<T> = core::result::Result<T, PatternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_gap() {
        assert!(PatternError::UnsupportedFeature("lookbehind assertions".into()).is_dialect_gap());
        assert!(
            PatternError::UnsupportedOptions {
                pos: 0,
                options: "i".into()
            }
            .is_dialect_gap()
        );
        assert!(!PatternError::UnbalancedGroup { pos: 3, unmatched: ')' }.is_dialect_gap());
        assert!(!PatternError::EmptyWordList.is_dialect_gap());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PatternError::UnsupportedFeature("lookbehind assertions".into()).to_string(),
            "lookbehind assertions are not supported"
        );
        assert_eq!(
            PatternError::UnbalancedGroup { pos: 3, unmatched: ')' }.to_string(),
            "unmatched ')' at pos 3"
        );
    }
}
