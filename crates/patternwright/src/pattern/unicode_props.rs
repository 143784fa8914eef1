//! # Unicode Property Expansion
//!
//! The target dialect has no `\p{..}` escapes; general category escapes are
//! unfolded into explicit UTF-16 code unit ranges over the Basic Multilingual
//! Plane.

use once_cell::sync::Lazy;
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::errors::{PWResult, PatternError};

/// Number of UTF-16 code units.
const BMP_SIZE: usize = 0x1_0000;

/// The general category of every BMP code unit; lone surrogates are `Cs`.
static BMP_CATEGORIES: Lazy<Vec<GeneralCategory>> = Lazy::new(|| {
    log::debug!("building BMP general category table");
    (0..BMP_SIZE as u32)
        .map(|unit| match char::from_u32(unit) {
            Some(c) => get_general_category(c),
            None => GeneralCategory::Surrogate,
        })
        .collect()
});

/// Resolve a property name to its member categories.
fn categories(name: &str) -> Option<&'static [GeneralCategory]> {
    use GeneralCategory::*;
    let cats: &'static [GeneralCategory] = match name {
        "L" => &[
            UppercaseLetter,
            LowercaseLetter,
            TitlecaseLetter,
            ModifierLetter,
            OtherLetter,
        ],
        "LC" | "L&" => &[UppercaseLetter, LowercaseLetter, TitlecaseLetter],
        "Lu" => &[UppercaseLetter],
        "Ll" => &[LowercaseLetter],
        "Lt" => &[TitlecaseLetter],
        "Lm" => &[ModifierLetter],
        "Lo" => &[OtherLetter],

        "M" => &[NonspacingMark, SpacingMark, EnclosingMark],
        "Mn" => &[NonspacingMark],
        "Mc" => &[SpacingMark],
        "Me" => &[EnclosingMark],

        "N" => &[DecimalNumber, LetterNumber, OtherNumber],
        "Nd" => &[DecimalNumber],
        "Nl" => &[LetterNumber],
        "No" => &[OtherNumber],

        "P" => &[
            ConnectorPunctuation,
            DashPunctuation,
            OpenPunctuation,
            ClosePunctuation,
            InitialPunctuation,
            FinalPunctuation,
            OtherPunctuation,
        ],
        "Pc" => &[ConnectorPunctuation],
        "Pd" => &[DashPunctuation],
        "Ps" => &[OpenPunctuation],
        "Pe" => &[ClosePunctuation],
        "Pi" => &[InitialPunctuation],
        "Pf" => &[FinalPunctuation],
        "Po" => &[OtherPunctuation],

        "S" => &[MathSymbol, CurrencySymbol, ModifierSymbol, OtherSymbol],
        "Sm" => &[MathSymbol],
        "Sc" => &[CurrencySymbol],
        "Sk" => &[ModifierSymbol],
        "So" => &[OtherSymbol],

        "Z" => &[SpaceSeparator, LineSeparator, ParagraphSeparator],
        "Zs" => &[SpaceSeparator],
        "Zl" => &[LineSeparator],
        "Zp" => &[ParagraphSeparator],

        "C" => &[Control, Format, Surrogate, PrivateUse, Unassigned],
        "Cc" => &[Control],
        "Cf" => &[Format],
        "Cs" => &[Surrogate],
        "Co" => &[PrivateUse],
        "Cn" => &[Unassigned],

        _ => return None,
    };
    Some(cats)
}

/// Inclusive code unit ranges whose membership in `cats` differs from `negate`.
fn unit_ranges(
    cats: &[GeneralCategory],
    negate: bool,
) -> Vec<(u32, u32)> {
    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for (unit, cat) in BMP_CATEGORIES.iter().enumerate() {
        if cats.contains(cat) == negate {
            continue;
        }
        let unit = unit as u32;
        match ranges.last_mut() {
            Some((_, hi)) if *hi + 1 == unit => *hi = unit,
            _ => ranges.push((unit, unit)),
        }
    }
    ranges
}

fn push_unit(
    out: &mut String,
    unit: u32,
) {
    match char::from_u32(unit) {
        Some(c) if c.is_ascii_alphanumeric() => out.push(c),
        _ => out.push_str(&format!("\\u{unit:04X}")),
    }
}

/// Render ranges as the body of a bracket expression.
fn render_ranges(
    ranges: &[(u32, u32)],
    out: &mut String,
) {
    for &(lo, hi) in ranges {
        push_unit(out, lo);
        if hi == lo + 1 {
            push_unit(out, hi);
        } else if hi > lo {
            out.push('-');
            push_unit(out, hi);
        }
    }
}

/// A parsed `\p` / `\P` escape.
struct PropertyEscape<'a> {
    name: &'a str,
    negated: bool,
    len: usize,
}

/// Parse the escape at the start of `text`, which begins with `\p` or `\P`.
fn parse_escape(text: &str) -> PWResult<PropertyEscape<'_>> {
    let mut negated = text.as_bytes()[1] == b'P';
    let rest = &text[2..];

    let (name, len) = if let Some(braced) = rest.strip_prefix('{') {
        let Some(close) = braced.find('}') else {
            return Err(PatternError::UnsupportedFeature(format!(
                "unterminated Unicode property escapes ({text:?})"
            )));
        };
        let mut name = &braced[..close];
        if let Some(inner) = name.strip_prefix('^') {
            negated = !negated;
            name = inner;
        }
        (name, 2 + close + 2)
    } else {
        match rest.chars().next() {
            Some(c) => (&rest[..c.len_utf8()], 2 + c.len_utf8()),
            None => {
                return Err(PatternError::UnsupportedFeature(
                    "bare \\p escapes".to_string(),
                ));
            }
        }
    };

    Ok(PropertyEscape { name, negated, len })
}

/// Copy `text` into `out`, unfolding Unicode property escapes.
///
/// ## Arguments
/// * `text` - literal pattern text, or the content of a bracket expression.
/// * `in_class` - whether `text` is the content of a bracket expression.
/// * `dot_all` - rewrite each unescaped `.` as `[\s\S]`.
/// * `out` - the output buffer.
pub fn expand_properties(
    text: &str,
    in_class: bool,
    dot_all: bool,
    out: &mut String,
) -> PWResult<()> {
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        match c {
            '\\' if rest[1..].starts_with(['p', 'P']) => {
                let escape = parse_escape(rest)?;
                let Some(cats) = categories(escape.name) else {
                    return Err(PatternError::UnsupportedFeature(format!(
                        "Unicode properties other than general categories ({:?})",
                        &rest[..escape.len]
                    )));
                };
                log::trace!("unfolding {:?}", &rest[..escape.len]);

                if in_class {
                    render_ranges(&unit_ranges(cats, escape.negated), out);
                } else {
                    out.push('[');
                    if escape.negated {
                        out.push('^');
                    }
                    render_ranges(&unit_ranges(cats, false), out);
                    out.push(']');
                }
                rest = &rest[escape.len..];
            }
            '\\' => {
                let len = rest[1..].chars().next().map_or(1, |n| 1 + n.len_utf8());
                out.push_str(&rest[..len]);
                rest = &rest[len..];
            }
            '.' if dot_all => {
                out.push_str("[\\s\\S]");
                rest = &rest[1..];
            }
            _ => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    Ok(())
}
