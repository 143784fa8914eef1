//! # Character Class Support
//!
//! Escaping of single symbols, and folding of symbol sets into bracket expressions.

use crate::types::Atom;

/// Symbols which carry a meaning outside of a bracket expression.
///
/// `! - : < = > }` are deliberately absent: they are only special in
/// contexts the synthesizer never produces.
const ESCAPED_SYMBOLS: &[char] = &[
    '\\', '.', '+', '*', '?', '[', '^', ']', '$', '(', ')', '{', '|', '#',
];

/// Escaped symbols which are plain literals inside a bracket expression.
///
/// `^` is last so that, once unescaped, it is never the first member of a class.
const LITERAL_IN_CLASS: &[char] = &['$', '(', ')', '*', '+', '.', '?', '[', '{', '|', '^'];

/// Render one codepoint as a pattern symbol.
pub fn escape_symbol(c: char) -> Atom {
    if c == '\0' {
        return Atom::const_new("\\x00");
    }
    let mut atom = Atom::default();
    if ESCAPED_SYMBOLS.contains(&c) {
        atom.push('\\');
    }
    atom.push(c);
    atom
}

fn escape_literal(c: char) -> Atom {
    let mut atom = Atom::default();
    atom.push(c);
    atom
}

/// Can `symbol` be placed in a bracket expression without altering its meaning?
///
/// Only one codepoint, optionally preceded by a backslash, qualifies; an
/// unescaped `.` does not.
pub fn is_class_safe(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('.'), None, _) | (Some('\\'), None, _) => false,
        (Some(_), None, _) => true,
        (Some('\\'), Some(_), None) => true,
        _ => false,
    }
}

/// Build a bracket expression matching any of `symbols`.
///
/// Symbols are kept in the given order, minus duplicates; `-` is moved to the
/// front and symbols which need no escaping inside brackets are unescaped and
/// moved to the back.
///
/// ## Arguments
/// * `symbols` - class-safe symbols; see [`is_class_safe`].
pub fn character_class<S: AsRef<str>>(symbols: &[S]) -> Atom {
    let mut members: Vec<Atom> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let symbol = symbol.as_ref();
        if !members.iter().any(|m| m == symbol) {
            members.push(symbol.into());
        }
    }

    if let Some(idx) = members.iter().position(|m| m == "-") {
        let dash = members.remove(idx);
        members.insert(0, dash);
    }

    for &c in LITERAL_IN_CLASS {
        if let Some(idx) = members
            .iter()
            .position(|m| m.strip_prefix('\\') == Some(&*c.encode_utf8(&mut [0u8; 4])))
        {
            members.remove(idx);
            members.push(escape_literal(c));
        }
    }

    let mut class = Atom::const_new("[");
    for member in &members {
        class.push_str(member);
    }
    class.push(']');
    class
}
