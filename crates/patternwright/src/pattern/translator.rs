//! # Dialect Translation
//!
//! Rewrites delimited PCRE-style patterns into JavaScript `RegExp` literals.
//!
//! ## Example
//! ```rust
//! use patternwright::pattern::translate_pattern;
//!
//! let translated = translate_pattern("#(?<year>\\d{4})/(?<month>\\d{2})#").unwrap();
//! assert_eq!(translated.pattern, "/(\\d{4})\\/(\\d{2})/");
//! assert_eq!(translated.capture_map.get("month"), Some(2));
//! ```

use crate::{
    errors::{PWResult, PatternError},
    pattern::{
        parser::parse_pattern,
        tokens::{GroupKind, PatternInfo, TokenItem},
        unicode_props::expand_properties,
    },
};

/// Modifiers whose effect is inlined into the translated body, or which have
/// no target equivalent.
pub const SOURCE_ONLY_MODIFIERS: &[char] = &['D', 'S', 's', 'u', 'x'];

/// Modifiers which mean the same in the target and are kept.
pub const TARGET_MODIFIERS: &[char] = &['i', 'm'];

/// Ordered map from capture name to its 1-based group index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureMap {
    entries: Vec<(String, usize)>,
}

impl CaptureMap {
    /// Record `name -> index`.
    ///
    /// A repeated name keeps its position and takes the new index.
    pub fn insert(
        &mut self,
        name: &str,
        index: usize,
    ) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, idx)) => *idx = index,
            None => self.entries.push((name.to_string(), index)),
        }
    }

    /// Look up the group index of `name`.
    pub fn get(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, idx)| idx)
    }

    /// The number of names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Are there no named captures?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, index)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(n, idx)| (n.as_str(), *idx))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CaptureMap {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, idx) in &self.entries {
            map.serialize_entry(name, idx)?;
        }
        map.end()
    }
}

/// The result of translating one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TranslatedPattern {
    /// The `/`-delimited target pattern, modifiers included.
    pub pattern: String,

    /// Named captures of the pattern.
    pub capture_map: CaptureMap,
}

/// Translate a delimited source pattern.
///
/// ## Arguments
/// * `pattern` - a delimited pattern, e.g. `#^\pL+$#iu`.
///
/// ## Returns
/// The target pattern and its capture map, or the first construct which could
/// not be translated.
pub fn translate_pattern(pattern: &str) -> PWResult<TranslatedPattern> {
    translate_parsed(&parse_pattern(pattern)?)
}

/// Translate an already parsed pattern.
pub fn translate_parsed(info: &PatternInfo) -> PWResult<TranslatedPattern> {
    let modifiers = translate_modifiers(&info.modifiers)?;
    let dot_all = info.has_modifier('s');
    let body = info.body.as_str();

    let mut out = String::with_capacity(body.len());
    let mut capture_map = CaptureMap::default();
    let mut capture_index = 0;

    let mut pos = 0;
    for token in &info.tokens {
        copy_literal(
            &body[pos..token.pos],
            dot_all,
            (&capture_map, capture_index),
            &mut out,
        )?;

        match &token.item {
            TokenItem::OptionGroup { .. } => {
                return Err(PatternError::UnsupportedFeature(
                    "regexp options".to_string(),
                ));
            }
            TokenItem::CharacterClass {
                content,
                quantifiers,
            } => {
                out.push('[');
                expand_properties(content, true, false, &mut out)?;
                out.push(']');
                out.extend(quantifiers.chars().next());
            }
            TokenItem::GroupStart(start) => match start.kind {
                GroupKind::Capturing => {
                    out.push('(');
                    capture_index += 1;
                    if let Some(name) = &start.name {
                        capture_map.insert(name, capture_index);
                    }
                }
                GroupKind::NonCapturing => {
                    if !start.options.is_empty() {
                        return Err(PatternError::UnsupportedOptions {
                            pos: token.pos,
                            options: start.options.clone(),
                        });
                    }
                    out.push_str("(?:");
                }
                GroupKind::Lookahead => out.push_str("(?="),
                GroupKind::NegativeLookahead => out.push_str("(?!"),
                GroupKind::Lookbehind => {
                    return Err(PatternError::UnsupportedFeature(
                        "lookbehind assertions".to_string(),
                    ));
                }
                GroupKind::NegativeLookbehind => {
                    return Err(PatternError::UnsupportedFeature(
                        "negative lookbehind assertions".to_string(),
                    ));
                }
            },
            TokenItem::GroupEnd(end) => {
                out.push(')');
                if !end.kind.is_assertion() {
                    out.extend(end.quantifiers.chars().next());
                }
            }
        }

        pos = token.end();
    }
    copy_literal(
        &body[pos..],
        dot_all,
        (&capture_map, capture_index),
        &mut out,
    )?;

    if info.delimiter != '/' {
        out = escape_slashes(&out);
    }

    let pattern = format!("/{out}/{modifiers}");
    log::debug!("translated {:?} to {pattern:?}", info.body);

    Ok(TranslatedPattern {
        pattern,
        capture_map,
    })
}

/// Filter source modifiers down to the target's flags.
///
/// Fails on modifiers which would change the meaning of the pattern.
fn translate_modifiers(modifiers: &str) -> PWResult<String> {
    let mut flags = String::new();
    for m in modifiers.chars() {
        if TARGET_MODIFIERS.contains(&m) {
            if !flags.contains(m) {
                flags.push(m);
            }
        } else if !SOURCE_ONLY_MODIFIERS.contains(&m) {
            return Err(PatternError::UnsupportedFeature(format!("{m:?} modifiers")));
        }
    }
    Ok(flags)
}

/// A backreference by name or by group number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backreference<'a> {
    Named(&'a str),
    Absolute(usize),
    Relative(usize),
}

/// Parse the `\k` or `\g` escape at the start of `text`.
///
/// Accepts `\k<name>`, `\k'name'`, `\k{name}`, `\g{name}`, `\g{N}`, `\g{-N}`,
/// `\gN` and `\g-N`. Returns the reference and its length in bytes.
fn parse_backreference(text: &str) -> Option<(Backreference<'_>, usize)> {
    let escape = text.as_bytes()[1];
    let rest = &text[2..];

    let close = match rest.as_bytes().first() {
        Some(b'<') if escape == b'k' => Some('>'),
        Some(b'\'') if escape == b'k' => Some('\''),
        Some(b'{') => Some('}'),
        _ => None,
    };
    let (reference, len) = match close {
        Some(close) => {
            let end = rest[1..].find(close)?;
            (&rest[1..1 + end], 2 + end + 2)
        }
        None if escape == b'g' => {
            let sign = usize::from(rest.starts_with('-'));
            let digits = rest[sign..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
            (&rest[..sign + digits], 2 + sign + digits)
        }
        None => return None,
    };

    let backreference = if let Some(count) = reference.strip_prefix('-') {
        if escape != b'g' {
            return None;
        }
        Backreference::Relative(count.parse().ok()?)
    } else if reference.starts_with(|c: char| c.is_ascii_digit()) {
        if escape != b'g' {
            return None;
        }
        Backreference::Absolute(reference.parse().ok()?)
    } else if reference.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && reference.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        Backreference::Named(reference)
    } else {
        return None;
    };

    Some((backreference, len))
}

/// Copy a literal span of the body, rewriting backreferences to group numbers.
///
/// `captures` holds the capture map and the index of the last capturing group
/// opened so far; only groups opened before the reference can be resolved.
fn copy_literal(
    text: &str,
    dot_all: bool,
    captures: (&CaptureMap, usize),
    out: &mut String,
) -> PWResult<()> {
    let (capture_map, capture_index) = captures;
    let bytes = text.as_bytes();

    let mut copied = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] != b'\\' {
            pos += 1;
            continue;
        }
        if !matches!(bytes.get(pos + 1), Some(b'k' | b'g')) {
            pos += 2;
            continue;
        }

        let Some((reference, len)) = parse_backreference(&text[pos..]) else {
            return Err(PatternError::UnsupportedFeature(format!(
                "malformed backreferences at {:?}",
                &text[pos..pos + 2]
            )));
        };
        let index = match reference {
            Backreference::Named(name) => capture_map.get(name),
            Backreference::Absolute(n) => Some(n),
            Backreference::Relative(n) => (capture_index + 1).checked_sub(n),
        }
        .filter(|index| (1..=capture_index).contains(index));
        let Some(index) = index else {
            return Err(PatternError::UnsupportedFeature(format!(
                "forward or unknown backreferences ({:?})",
                &text[pos..pos + len]
            )));
        };
        log::trace!("backreference {:?} is group {index}", &text[pos..pos + len]);

        expand_properties(&text[copied..pos], false, dot_all, out)?;
        pos += len;
        copied = pos;

        if text[pos..].starts_with(|c: char| c.is_ascii_digit()) {
            out.push_str(&format!("(?:\\{index})"));
        } else {
            out.push_str(&format!("\\{index}"));
        }
    }

    expand_properties(&text[copied..], false, dot_all, out)
}

/// Escape every `/` not already escaped.
pub fn escape_slashes(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut backslashes = 0;
    for c in body.chars() {
        if c == '/' && backslashes % 2 == 0 {
            out.push('\\');
        }
        if c == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
        out.push(c);
    }
    out
}
