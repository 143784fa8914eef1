//! # Pattern Tokens
//!
//! The structural view of a delimited pattern produced by the
//! [`PatternParser`](crate::pattern::PatternParser).

/// The kind of a parenthesized group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GroupKind {
    /// `(...)`, `(?<name>...)`, `(?P<name>...)` or `(?'name'...)`.
    Capturing,

    /// `(?:...)`, `(?i:...)` or the atomic `(?>...)`.
    NonCapturing,

    /// `(?=...)`.
    Lookahead,

    /// `(?!...)`.
    NegativeLookahead,

    /// `(?<=...)`.
    Lookbehind,

    /// `(?<!...)`.
    NegativeLookbehind,
}

impl GroupKind {
    /// Is this a zero-width assertion?
    pub fn is_assertion(&self) -> bool {
        !matches!(self, Self::Capturing | Self::NonCapturing)
    }
}

/// The opening token of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupStart {
    /// The kind of group.
    pub kind: GroupKind,

    /// The capture name, for named captures.
    pub name: Option<String>,

    /// Inline option letters of a non-capturing group, e.g. `i` in `(?i:...)`.
    pub options: String,

    /// Whether this is an atomic group, `(?>...)`.
    pub atomic: bool,

    /// Index of the matching [`GroupEnd`] token.
    pub end_token: usize,
}

/// The closing token of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupEnd {
    /// The kind of group; always that of the matching [`GroupStart`].
    pub kind: GroupKind,

    /// Index of the matching [`GroupStart`] token.
    pub start_token: usize,

    /// The run of `+`/`*` repetition quantifiers following the `)`.
    pub quantifiers: String,
}

/// The payload of a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenItem {
    /// A bracket expression, e.g. `[a-z]+`.
    CharacterClass {
        /// The text between the brackets.
        content: String,

        /// The quantifiers following the `]`, e.g. `+`, `*+`.
        quantifiers: String,
    },

    /// An inline option setting, e.g. `(?i)`.
    OptionGroup {
        /// The option letters.
        options: String,
    },

    /// The start of a group.
    GroupStart(GroupStart),

    /// The end of a group.
    GroupEnd(GroupEnd),
}

/// Flat label for a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum TokenKind {
    CharacterClass,
    OptionGroup,
    CapturingGroupStart,
    CapturingGroupEnd,
    NonCapturingGroupStart,
    NonCapturingGroupEnd,
    LookaheadStart,
    LookaheadEnd,
    NegativeLookaheadStart,
    NegativeLookaheadEnd,
    LookbehindStart,
    LookbehindEnd,
    NegativeLookbehindStart,
    NegativeLookbehindEnd,
}

impl TokenKind {
    fn group(
        kind: GroupKind,
        start: bool,
    ) -> Self {
        use GroupKind::*;
        match (kind, start) {
            (Capturing, true) => Self::CapturingGroupStart,
            (Capturing, false) => Self::CapturingGroupEnd,
            (NonCapturing, true) => Self::NonCapturingGroupStart,
            (NonCapturing, false) => Self::NonCapturingGroupEnd,
            (Lookahead, true) => Self::LookaheadStart,
            (Lookahead, false) => Self::LookaheadEnd,
            (NegativeLookahead, true) => Self::NegativeLookaheadStart,
            (NegativeLookahead, false) => Self::NegativeLookaheadEnd,
            (Lookbehind, true) => Self::LookbehindStart,
            (Lookbehind, false) => Self::LookbehindEnd,
            (NegativeLookbehind, true) => Self::NegativeLookbehindStart,
            (NegativeLookbehind, false) => Self::NegativeLookbehindEnd,
        }
    }
}

impl core::fmt::Display for TokenKind {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// A structural token of a pattern body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    /// Byte offset of the token in the pattern body.
    pub pos: usize,

    /// Byte length of the token, quantifiers included.
    pub len: usize,

    /// The token payload.
    pub item: TokenItem,
}

impl Token {
    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.pos + self.len
    }

    /// The flat kind of this token.
    pub fn kind(&self) -> TokenKind {
        match &self.item {
            TokenItem::CharacterClass { .. } => TokenKind::CharacterClass,
            TokenItem::OptionGroup { .. } => TokenKind::OptionGroup,
            TokenItem::GroupStart(start) => TokenKind::group(start.kind, true),
            TokenItem::GroupEnd(end) => TokenKind::group(end.kind, false),
        }
    }
}

/// A parsed delimited pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PatternInfo {
    /// The delimiter character, e.g. `/` or `#`.
    pub delimiter: char,

    /// The modifier letters following the closing delimiter.
    pub modifiers: String,

    /// The text between the delimiters.
    pub body: String,

    /// Offset-ordered, well-nested tokens of `body`.
    pub tokens: Vec<Token>,
}

impl PatternInfo {
    /// Does the pattern carry the modifier `m`?
    pub fn has_modifier(
        &self,
        m: char,
    ) -> bool {
        self.modifiers.contains(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_kind_predicates() {
        assert!(!GroupKind::Capturing.is_assertion());
        assert!(!GroupKind::NonCapturing.is_assertion());
        assert!(GroupKind::Lookahead.is_assertion());
        assert!(GroupKind::NegativeLookbehind.is_assertion());
    }

    #[test]
    fn test_token_kind() {
        let token = Token {
            pos: 4,
            len: 2,
            item: TokenItem::GroupEnd(GroupEnd {
                kind: GroupKind::NegativeLookahead,
                start_token: 0,
                quantifiers: "+".into(),
            }),
        };
        assert_eq!(token.end(), 6);
        assert_eq!(token.kind(), TokenKind::NegativeLookaheadEnd);
        assert_eq!(token.kind().to_string(), "NegativeLookaheadEnd");
    }
}
