//! # `patternwright` Regex Dialect Toolkit
//!
//! `patternwright` builds and rewrites regular expressions for
//! markup-processing pipelines which run both server side (PCRE-style) and in
//! the browser (JavaScript `RegExp`).
//!
//! See:
//! * [`synthesis`] to build a compact pattern from a list of words.
//! * [`pattern`] to tokenize delimited patterns and translate them to JavaScript.
//! * [`errors`] for the failure modes shared by both.
//!
//! ## Synthesis
//!
//! ```rust
//! use patternwright::synthesis::{WordListOptions, build_regex_from_words};
//!
//! let options = WordListOptions::default().with_lookahead(true);
//! let pattern = build_regex_from_words(&["foo", "bar", "baz"], &options).unwrap();
//! assert_eq!(pattern, "(?=[bf])(?:ba[rz]|foo)");
//! ```
//!
//! ## Translation
//!
//! ```rust
//! use patternwright::pattern::translate_pattern;
//!
//! let translated = translate_pattern("#^(?<word>[a-z]+)/.#s").unwrap();
//! assert_eq!(translated.pattern, r"/^([a-z]+)\/[\s\S]/");
//! assert_eq!(translated.capture_map.get("word"), Some(1));
//! ```
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

pub mod errors;
pub mod pattern;
pub mod synthesis;
pub mod types;

#[doc(inline)]
pub use errors::{PWResult, PatternError};
#[doc(inline)]
pub use pattern::{PatternInfo, TranslatedPattern, parse_pattern, translate_pattern};
#[doc(inline)]
pub use synthesis::{WordListOptions, build_regex_from_words};
