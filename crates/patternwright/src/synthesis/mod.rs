//! # Regex Synthesis
//!
//! Builds a compact regex fragment matching exactly a given list of words.
//!
//! See:
//! * [`build_regex_from_words`] for the entry point.
//! * [`ChainMerger`] for the recursive folding of symbol chains.
//! * [`character_class`] for bracket expression folding.

mod chain_merger;
mod char_class;
mod word_list;

#[doc(inline)]
pub use chain_merger::*;
#[doc(inline)]
pub use char_class::*;
#[doc(inline)]
pub use word_list::*;
