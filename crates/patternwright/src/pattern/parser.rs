//! # Pattern Parser
//!
//! A structural tokenizer for delimited PCRE-style patterns.
//!
//! Only the features which matter to translation are tokenized: groups,
//! assertions, option settings and character classes. Everything else is
//! treated as opaque literal text.

use crate::{
    errors::{PWResult, PatternError},
    pattern::tokens::{GroupEnd, GroupKind, GroupStart, PatternInfo, Token, TokenItem},
};

/// Default limit on group nesting.
pub const DEFAULT_MAX_GROUP_DEPTH: usize = 256;

/// Assertion openers, after `(?`.
const ASSERTIONS: &[(&str, GroupKind)] = &[
    ("=", GroupKind::Lookahead),
    ("!", GroupKind::NegativeLookahead),
    ("<=", GroupKind::Lookbehind),
    ("<!", GroupKind::NegativeLookbehind),
];

/// Tokenizer for delimited patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternParser {
    max_depth: usize,
}

impl Default for PatternParser {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_GROUP_DEPTH,
        }
    }
}

impl PatternParser {
    /// Sets the group nesting limit.
    pub fn with_max_depth(
        mut self,
        max_depth: usize,
    ) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse a delimited pattern, e.g. `#^[a-z]+$#i`.
    ///
    /// Under the extended modifier `x`, the body is reported with its
    /// whitespace and `#` comments already removed.
    pub fn parse(
        &self,
        pattern: &str,
    ) -> PWResult<PatternInfo> {
        let (delimiter, body, modifiers) = split_delimiters(pattern)?;
        let body = if modifiers.contains('x') {
            strip_extended(body)
        } else {
            body.to_string()
        };
        let tokens = self.tokenize(&body)?;

        Ok(PatternInfo {
            delimiter,
            modifiers: modifiers.to_string(),
            body,
            tokens,
        })
    }

    /// Tokenize an undelimited pattern body.
    ///
    /// Token offsets are byte offsets into `body`.
    pub fn tokenize(
        &self,
        body: &str,
    ) -> PWResult<Vec<Token>> {
        let bytes = body.as_bytes();
        let mut tokens: Vec<Token> = Vec::new();
        let mut open: Vec<(usize, GroupKind)> = Vec::new();

        let mut pos = 0;
        while pos < bytes.len() {
            match bytes[pos] {
                b'\\' => {
                    pos += 2;
                }
                b'[' => {
                    let token = scan_character_class(body, pos)?;
                    pos = token.end();
                    tokens.push(token);
                }
                b'(' => {
                    let token = scan_group_start(body, pos)?;
                    pos = token.end();

                    if let TokenItem::GroupStart(start) = &token.item {
                        if open.len() >= self.max_depth {
                            return Err(PatternError::NestingTooDeep {
                                limit: self.max_depth,
                            });
                        }
                        open.push((tokens.len(), start.kind));
                    }
                    tokens.push(token);
                }
                b')' => {
                    let Some((start_token, kind)) = open.pop() else {
                        return Err(PatternError::UnbalancedGroup { pos, unmatched: ')' });
                    };

                    let quantifiers = bytes[pos + 1..]
                        .iter()
                        .take_while(|&&b| b == b'+' || b == b'*')
                        .count();

                    let end_token = tokens.len();
                    if let TokenItem::GroupStart(start) = &mut tokens[start_token].item {
                        start.end_token = end_token;
                    }

                    tokens.push(Token {
                        pos,
                        len: 1 + quantifiers,
                        item: TokenItem::GroupEnd(GroupEnd {
                            kind,
                            start_token,
                            quantifiers: body[pos + 1..pos + 1 + quantifiers].to_string(),
                        }),
                    });
                    pos += 1 + quantifiers;
                }
                _ => {
                    pos += 1;
                }
            }
        }

        if let Some(&(idx, _)) = open.first() {
            return Err(PatternError::UnbalancedGroup {
                pos: tokens[idx].pos,
                unmatched: '(',
            });
        }

        Ok(tokens)
    }
}

/// Parse a delimited pattern with the default [`PatternParser`].
pub fn parse_pattern(pattern: &str) -> PWResult<PatternInfo> {
    PatternParser::default().parse(pattern)
}

/// Tokenize an undelimited pattern body with the default [`PatternParser`].
pub fn tokenize_body(body: &str) -> PWResult<Vec<Token>> {
    PatternParser::default().tokenize(body)
}

/// Split `<delim>body<delim>modifiers`.
fn split_delimiters(pattern: &str) -> PWResult<(char, &str, &str)> {
    let Some(delimiter) = pattern.chars().next() else {
        return Err(PatternError::MalformedDelimiters("empty pattern".to_string()));
    };
    if delimiter.is_alphanumeric() || delimiter.is_whitespace() || delimiter == '\\' {
        return Err(PatternError::MalformedDelimiters(format!(
            "invalid delimiter {delimiter:?}"
        )));
    }

    let start = delimiter.len_utf8();
    let mut escaped = false;
    for (idx, c) in pattern[start..].char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == delimiter {
            let body = &pattern[start..start + idx];
            let modifiers = &pattern[start + idx + c.len_utf8()..];

            if !modifiers.chars().all(|m| m.is_ascii_alphabetic()) {
                return Err(PatternError::MalformedDelimiters(format!(
                    "unexpected text after the closing delimiter: {modifiers:?}"
                )));
            }
            return Ok((delimiter, body, modifiers));
        }
    }

    Err(PatternError::MalformedDelimiters(format!(
        "no closing delimiter {delimiter:?}"
    )))
}

/// Remove the whitespace and `#` comments ignored under the `x` modifier.
///
/// Escaped characters and bracket expressions are kept as written.
fn strip_extended(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                out.extend(chars.next());
            }
            _ if in_class => {
                in_class = c != ']';
                out.push(c);
            }
            '[' => {
                in_class = true;
                out.push(c);
            }
            '#' => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            _ if c.is_ascii_whitespace() || c == '\x0b' => (),
            _ => out.push(c),
        }
    }
    out
}

/// Scan `[...]` plus trailing quantifiers, starting at the `[`.
///
/// The class ends at the first `]` preceded by an even number of backslashes.
fn scan_character_class(
    body: &str,
    pos: usize,
) -> PWResult<Token> {
    let bytes = body.as_bytes();

    let mut close = pos + 1;
    let mut backslashes = 0;
    loop {
        match bytes.get(close) {
            None => return Err(PatternError::MalformedCharacterClass { pos }),
            Some(b']') if backslashes % 2 == 0 => break,
            Some(b'\\') => backslashes += 1,
            Some(_) => backslashes = 0,
        }
        close += 1;
    }

    let mut end = close + 1;
    if matches!(bytes.get(end), Some(b'+' | b'*')) {
        end += 1;
        if bytes.get(end) == Some(&b'+') {
            end += 1;
        }
    }

    Ok(Token {
        pos,
        len: end - pos,
        item: TokenItem::CharacterClass {
            content: body[pos + 1..close].to_string(),
            quantifiers: body[close + 1..end].to_string(),
        },
    })
}

/// Scan the opening of a group or option setting, starting at the `(`.
fn scan_group_start(
    body: &str,
    pos: usize,
) -> PWResult<Token> {
    let group = |len: usize, kind: GroupKind| Token {
        pos,
        len,
        item: TokenItem::GroupStart(GroupStart {
            kind,
            name: None,
            options: String::new(),
            atomic: false,
            end_token: 0,
        }),
    };

    let Some(rest) = body[pos..].strip_prefix("(?") else {
        log::trace!("capturing group at {pos}");
        return Ok(group(1, GroupKind::Capturing));
    };

    let option_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic() || *b == b'-')
        .count();
    let options = &rest[..option_len];

    if rest.as_bytes().get(option_len) == Some(&b')') {
        log::trace!("option setting {options:?} at {pos}");
        return Ok(Token {
            pos,
            len: 2 + option_len + 1,
            item: TokenItem::OptionGroup {
                options: options.to_string(),
            },
        });
    }

    if let Some((name, len)) = scan_capture_name(rest) {
        log::trace!("named capture {name:?} at {pos}");
        let mut token = group(2 + len, GroupKind::Capturing);
        if let TokenItem::GroupStart(start) = &mut token.item {
            start.name = Some(name.to_string());
        }
        return Ok(token);
    }

    if rest.as_bytes().get(option_len) == Some(&b':') {
        log::trace!("non-capturing group at {pos}");
        let mut token = group(2 + option_len + 1, GroupKind::NonCapturing);
        if let TokenItem::GroupStart(start) = &mut token.item {
            start.options = options.to_string();
        }
        return Ok(token);
    }

    if rest.starts_with('>') {
        log::trace!("atomic group at {pos}");
        let mut token = group(3, GroupKind::NonCapturing);
        if let TokenItem::GroupStart(start) = &mut token.item {
            start.atomic = true;
        }
        return Ok(token);
    }

    for &(opener, kind) in ASSERTIONS {
        if rest.starts_with(opener) {
            log::trace!("{kind:?} assertion at {pos}");
            return Ok(group(2 + opener.len(), kind));
        }
    }

    Err(PatternError::UnsupportedSubpattern { pos })
}

/// Scan `<name>`, `P<name>` or `'name'` at the start of `rest`.
///
/// Returns the name and the number of bytes consumed.
fn scan_capture_name(rest: &str) -> Option<(&str, usize)> {
    let (skip, close) = if rest.starts_with("P<") {
        (2, b'>')
    } else if rest.starts_with('<') {
        (1, b'>')
    } else if rest.starts_with('\'') {
        (1, b'\'')
    } else {
        return None;
    };

    let name = &rest[skip..];
    let name_len = name
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();

    if name_len == 0 || name.as_bytes()[0].is_ascii_digit() {
        return None;
    }
    if name.as_bytes().get(name_len) != Some(&close) {
        return None;
    }

    Some((&name[..name_len], skip + name_len + 1))
}
