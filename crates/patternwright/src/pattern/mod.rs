//! # Pattern Parsing and Translation
//!
//! [`PatternParser`] splits a delimited PCRE-style pattern into a
//! [`PatternInfo`]: delimiter, modifiers, body and a well-nested list of
//! structural [`Token`]s.
//!
//! [`translate_pattern`] rewrites such a pattern for JavaScript, failing on
//! constructs the target has no equivalent for.

pub mod unicode_props;

mod parser;
mod tokens;
mod translator;

#[doc(inline)]
pub use parser::*;
#[doc(inline)]
pub use tokens::*;
#[doc(inline)]
pub use translator::*;
