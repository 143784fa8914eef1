//! # Word List Synthesis
//!
//! ## Example
//! ```rust
//! use patternwright::synthesis::{WordListOptions, build_regex_from_words};
//!
//! let options = WordListOptions::default();
//! let pattern = build_regex_from_words(&["cat", "car", "cart"], &options).unwrap();
//! assert_eq!(pattern, "ca(?:t|rt?)");
//! ```

use crate::{
    errors::{PWResult, PatternError},
    synthesis::{
        chain_merger::{ChainMerger, DEFAULT_MAX_MERGE_DEPTH, assemble},
        char_class::{character_class, escape_symbol, is_class_safe},
    },
    types::{Atom, Chain, PWHashMap, hash_map_new},
};

/// Options for [`build_regex_from_words`].
#[derive(Debug, Clone, PartialEq)]
pub struct WordListOptions {
    /// Replacement renderings for individual codepoints.
    ///
    /// These take precedence over the default escaping; e.g. `'*' => ".*?"`
    /// turns `*` into a wildcard.
    pub special_chars: PWHashMap<char, Atom>,

    /// Prefix the result with a lookahead over the possible first symbols.
    pub use_lookahead: bool,

    /// Recursion limit for chain merging.
    pub max_depth: usize,
}

impl Default for WordListOptions {
    fn default() -> Self {
        Self {
            special_chars: hash_map_new(),
            use_lookahead: false,
            max_depth: DEFAULT_MAX_MERGE_DEPTH,
        }
    }
}

impl WordListOptions {
    /// Render `c` as `text` rather than as an escaped literal.
    pub fn with_special_char<S: Into<Atom>>(
        mut self,
        c: char,
        text: S,
    ) -> Self {
        self.special_chars.insert(c, text.into());
        self
    }

    /// Sets whether to prefix a lookahead over the initial symbols.
    pub fn with_lookahead(
        mut self,
        use_lookahead: bool,
    ) -> Self {
        self.use_lookahead = use_lookahead;
        self
    }

    /// Sets the chain merge recursion limit.
    pub fn with_max_depth(
        mut self,
        max_depth: usize,
    ) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn symbol(
        &self,
        c: char,
    ) -> Atom {
        match self.special_chars.get(&c) {
            Some(text) => text.clone(),
            None => escape_symbol(c),
        }
    }
}

/// Build a regex fragment which matches exactly the given words.
///
/// The result is independent of the order of `words`, and carries no
/// delimiters or anchors.
///
/// ## Arguments
/// * `words` - UTF-8 encoded words; duplicates are ignored.
/// * `options` - synthesis options.
///
/// ## Returns
/// The pattern, or an error for an empty list, a non-UTF-8 word, or a merge
/// which recursed too deep.
pub fn build_regex_from_words<W: AsRef<[u8]>>(
    words: &[W],
    options: &WordListOptions,
) -> PWResult<String> {
    if words.is_empty() {
        return Err(PatternError::EmptyWordList);
    }

    let mut decoded: Vec<&str> = words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            core::str::from_utf8(word.as_ref())
                .map_err(|source| PatternError::Encoding { index, source })
        })
        .collect::<PWResult<_>>()?;
    decoded.sort_unstable();
    decoded.dedup();

    // The empty word has no initial; a lookahead would exclude it.
    let has_empty_word = decoded.first().is_some_and(|word| word.is_empty());

    let mut initials: Vec<Atom> = Vec::new();
    let chains: Vec<Chain> = decoded
        .iter()
        .map(|word| {
            let chain: Chain = word.chars().map(|c| options.symbol(c)).collect();
            if let Some(initial) = chain.first()
                && !initials.contains(initial)
            {
                initials.push(initial.clone());
            }
            chain
        })
        .collect();

    let merger = ChainMerger::new(options.max_depth);
    let mut pattern = assemble(vec![merger.merge(chains)?], false);

    if options.use_lookahead
        && !has_empty_word
        && initials.len() > 1
        && !pattern.starts_with('[')
        && initials.iter().all(|initial| is_class_safe(initial))
    {
        pattern = compact_str::format_compact!("(?={}){pattern}", character_class(&initials));
    }

    log::debug!(
        "synthesized {:?} from {} words",
        pattern.as_str(),
        decoded.len()
    );
    Ok(pattern.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(words: &[&str]) -> String {
        build_regex_from_words(words, &WordListOptions::default()).unwrap()
    }

    #[test]
    fn test_options_builder() {
        let options = WordListOptions::default()
            .with_lookahead(true)
            .with_max_depth(8)
            .with_special_char('*', ".*?");
        assert!(options.use_lookahead);
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.symbol('*'), ".*?");
        assert_eq!(options.symbol('+'), "\\+");
    }

    #[test]
    fn test_single_word() {
        assert_eq!(build(&["foo"]), "foo");
        assert_eq!(build(&["a.b"]), "a\\.b");
        assert_eq!(build(&["a:b-c!"]), "a:b-c!");
    }

    #[test]
    fn test_character_class() {
        assert_eq!(build(&["cat", "car"]), "ca[rt]");
        assert_eq!(build(&["car", "cat"]), "ca[rt]");
    }

    #[test]
    fn test_alternation() {
        assert_eq!(build(&["foo", "bar"]), "(?:bar|foo)");
    }

    #[test]
    fn test_optional() {
        assert_eq!(build(&["a", "ab"]), "ab?");
        assert_eq!(build(&["", "x"]), "x?");
    }

    #[test]
    fn test_duplicates() {
        assert_eq!(build(&["ab", "ab", "a"]), "ab?");
    }

    #[test]
    fn test_order_independence() {
        let words = ["apple", "applet", "apply", "banana", "band"];
        let mut reversed = words;
        reversed.reverse();
        assert_eq!(build(&words), build(&reversed));
    }

    #[test]
    fn test_lookahead() {
        let options = WordListOptions::default().with_lookahead(true);
        assert_eq!(
            build_regex_from_words(&["foo", "bar"], &options).unwrap(),
            "(?=[bf])(?:bar|foo)"
        );

        // One initial.
        assert_eq!(
            build_regex_from_words(&["foo", "fiz"], &options).unwrap(),
            "f(?:iz|oo)"
        );

        // Already a bracket expression.
        assert_eq!(
            build_regex_from_words(&["a", "b"], &options).unwrap(),
            "[ab]"
        );

        // The empty word has no initial.
        assert_eq!(
            build_regex_from_words(&["", "ab", "cd"], &options).unwrap(),
            "(?:ab|cd)?"
        );
        assert_eq!(
            build_regex_from_words(&[".", "aa", ""], &options).unwrap(),
            "(?:\\.|aa)?"
        );

        // Initials which cannot be placed in a class.
        let options = options.with_special_char('*', ".*?");
        assert_eq!(
            build_regex_from_words(&["*x", "bar"], &options).unwrap(),
            "(?:.*?x|bar)"
        );
    }

    #[test]
    fn test_special_chars() {
        let options = WordListOptions::default().with_special_char('*', ".*?");
        assert_eq!(
            build_regex_from_words(&["a*", "ab"], &options).unwrap(),
            "a(?:b|.*?)"
        );
    }

    #[test]
    fn test_bytes_input() {
        let words: Vec<Vec<u8>> = vec![b"cat".to_vec(), "cät".as_bytes().to_vec()];
        assert_eq!(
            build_regex_from_words(&words, &WordListOptions::default()).unwrap(),
            "c[aä]t"
        );
    }

    #[test]
    fn test_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(
            build_regex_from_words(&empty, &WordListOptions::default()),
            Err(PatternError::EmptyWordList)
        );

        let words: [&[u8]; 2] = [b"ok", b"\xff"];
        assert!(matches!(
            build_regex_from_words(&words, &WordListOptions::default()),
            Err(PatternError::Encoding { index: 1, .. })
        ));

        let options = WordListOptions::default().with_max_depth(0);
        assert_eq!(
            build_regex_from_words(&["ab", "cd", "ce"], &options),
            Err(PatternError::RecursionLimit { limit: 0 })
        );
    }
}
