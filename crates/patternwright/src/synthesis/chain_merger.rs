//! # Chain Merger
//!
//! Folds a list of symbol chains into one minimal alternation.
//!
//! Each pass:
//!
//! 1. removes the longest prefix shared by all the chains;
//! 2. removes the longest suffix shared by all the chains;
//! 3. groups the chains by their first atom (head of chain);
//! 4. if no group has more than one chain, assembles them into an alternation
//!    such as `(?:aa|bb)`; otherwise merges each group on its own, factors out
//!    common two-atom tails, and merges the results together again.
//!
//! A chain which is consumed entirely by prefix/suffix removal marks the middle
//! of the expression as optional, e.g. `prefix(?:foo)?suffix`.

use compact_str::format_compact;

use crate::{
    errors::{PWResult, PatternError},
    pattern::{GroupKind, TokenItem, tokenize_body},
    synthesis::char_class::{character_class, is_class_safe},
    types::{Atom, Chain, PWHashMap, hash_map_new},
};

/// Default limit on merge recursion.
pub const DEFAULT_MAX_MERGE_DEPTH: usize = 256;

/// Recursive chain merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainMerger {
    max_depth: usize,
}

impl Default for ChainMerger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MERGE_DEPTH)
    }
}

impl ChainMerger {
    /// Create a merger which fails beyond `max_depth` levels of recursion.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Merge `chains` into a single chain.
    ///
    /// The atoms of the returned chain, concatenated, form an expression
    /// matching exactly the concatenations of each input chain.
    pub fn merge(
        &self,
        chains: Vec<Chain>,
    ) -> PWResult<Chain> {
        self.merge_at(chains, 0)
    }

    fn merge_at(
        &self,
        mut chains: Vec<Chain>,
        depth: usize,
    ) -> PWResult<Chain> {
        if depth > self.max_depth {
            return Err(PatternError::RecursionLimit {
                limit: self.max_depth,
            });
        }

        if chains.len() < 2 {
            return Ok(chains.pop().unwrap_or_default());
        }

        log::trace!("merging {} chains at depth {depth}", chains.len());

        let mut merged = remove_common_prefix(&mut chains);

        if chains.iter().all(Vec::is_empty) {
            // Identical chains; the prefix is all there is.
            return Ok(merged);
        }

        let suffix = remove_common_suffix(&mut chains);

        let end_of_chain = chains.iter().any(Vec::is_empty);
        let mut groups = group_by_atom(
            chains
                .into_iter()
                .filter(|c| !c.is_empty())
                .map(|c| (c[0].clone(), c)),
        );
        let remerge = groups.iter().any(|(_, group)| group.len() > 1);

        if remerge {
            fold_single_symbol_groups(&mut groups);

            let mut merged_chains = Vec::with_capacity(groups.len());
            for (_, group) in groups {
                merged_chains.push(self.merge_at(group, depth + 1)?);
            }
            let merged_chains = self.merge_tails(merged_chains, depth)?;

            let mut expr = join(&self.merge_at(merged_chains, depth + 1)?);
            if end_of_chain {
                expr = make_optional(&expr);
            }
            merged.push(expr);
        } else {
            let chains = groups.into_iter().flat_map(|(_, group)| group).collect();
            merged.push(assemble(chains, end_of_chain));
        }

        merged.extend(suffix);
        Ok(merged)
    }

    /// Factor out tails shared by two-atom chains with class-safe heads.
    ///
    /// `(?:a[xy]|b[xy]|c)` becomes `(?:c|[ab][xy])`. Only chains whose heads
    /// can fold into a class are considered, so no extra group is introduced:
    /// `(?:c|a[xy]|bb[xy])` is left alone.
    ///
    /// Must only be called on chains which have already been merged by head.
    fn merge_tails(
        &self,
        chains: Vec<Chain>,
        depth: usize,
    ) -> PWResult<Vec<Chain>> {
        let candidates = group_by_atom(
            chains
                .iter()
                .enumerate()
                .filter(|(_, c)| c.len() == 2 && is_class_safe(&c[0]))
                .map(|(idx, c)| (c[1].clone(), idx)),
        );

        let mut slots: Vec<Option<Chain>> = chains.into_iter().map(Some).collect();
        for (tail, members) in candidates {
            if members.len() < 2 {
                continue;
            }
            log::trace!("merging {} chains sharing tail {tail:?}", members.len());

            let group = members
                .into_iter()
                .filter_map(|idx| slots[idx].take())
                .collect();
            let merged = self.merge_at(group, depth + 1)?;
            slots.push(Some(merged));
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Group keyed `items`, preserving the first-seen order of the keys.
fn group_by_atom<T, I>(items: I) -> Vec<(Atom, Vec<T>)>
where
    I: IntoIterator<Item = (Atom, T)>,
{
    let mut index: PWHashMap<Atom, usize> = hash_map_new();
    let mut groups: Vec<(Atom, Vec<T>)> = Vec::new();
    for (atom, item) in items {
        match index.get(&atom) {
            Some(&idx) => groups[idx].1.push(item),
            None => {
                index.insert(atom.clone(), groups.len());
                groups.push((atom, vec![item]));
            }
        }
    }
    groups
}

/// Replace groups made of one class-safe symbol with a single character class group.
///
/// The class group goes first; [`assemble`] also puts classes first, and the
/// shared ordering lets identical sub-expressions be factored out upstream.
fn fold_single_symbol_groups(groups: &mut Vec<(Atom, Vec<Chain>)>) {
    let mut members: Vec<Atom> = groups
        .iter()
        .filter(|(head, group)| group.len() == 1 && group[0].len() == 1 && is_class_safe(head))
        .map(|(head, _)| head.clone())
        .collect();

    if members.len() < 2 {
        return;
    }
    members.sort();

    groups.retain(|(head, _)| !members.contains(head));
    let class = character_class(&members);

    // A chain may already start with the same class, e.g. through a special char.
    let mut group = match groups.iter().position(|(head, _)| *head == class) {
        Some(idx) => groups.remove(idx),
        None => (class.clone(), Vec::new()),
    };
    group.1.push(vec![class]);
    groups.insert(0, group);
}

/// Remove and return the longest prefix shared by every chain.
fn remove_common_prefix(chains: &mut [Chain]) -> Chain {
    let bound = chains.iter().map(Vec::len).min().unwrap_or(0);
    let len = (0..bound)
        .take_while(|&i| chains.iter().all(|c| c[i] == chains[0][i]))
        .count();

    if len == 0 {
        return Chain::new();
    }

    let prefix = chains[0][..len].to_vec();
    for chain in chains.iter_mut() {
        chain.drain(..len);
    }
    prefix
}

/// Remove and return the longest suffix shared by every chain.
///
/// Meant to run after [`remove_common_prefix`]: when every chain has the same
/// length, the suffix is capped one atom short of the full length.
fn remove_common_suffix(chains: &mut [Chain]) -> Chain {
    let shortest = chains.iter().map(Vec::len).min().unwrap_or(0);
    let longest = chains.iter().map(Vec::len).max().unwrap_or(0);

    let mut bound = shortest;
    if longest == shortest {
        bound = bound.saturating_sub(1);
    }

    fn atom_from_end(
        chain: &Chain,
        i: usize,
    ) -> &Atom {
        &chain[chain.len() - 1 - i]
    }

    let len = (0..bound)
        .take_while(|&i| {
            let atom = atom_from_end(&chains[0], i);
            chains.iter().all(|c| atom_from_end(c, i) == atom)
        })
        .count();

    if len == 0 {
        return Chain::new();
    }

    let suffix = chains[0][chains[0].len() - len..].to_vec();
    for chain in chains.iter_mut() {
        chain.truncate(chain.len() - len);
    }
    suffix
}

/// Concatenate the atoms of a chain.
pub(crate) fn join(chain: &[Atom]) -> Atom {
    let mut expr = Atom::default();
    for atom in chain {
        expr.push_str(atom);
    }
    expr
}

/// Assemble chains into one alternation.
///
/// Single class-safe symbols are collected into a leading character class;
/// empty chains (and `optional`) make the whole expression optional.
pub(crate) fn assemble(
    chains: Vec<Chain>,
    mut optional: bool,
) -> Atom {
    let mut class_members: Vec<Atom> = Vec::new();
    let mut branches: Vec<Atom> = Vec::new();

    for chain in chains {
        match chain.as_slice() {
            [] => optional = true,
            [symbol] if is_class_safe(symbol) => {
                if !class_members.contains(symbol) {
                    class_members.push(symbol.clone());
                }
            }
            atoms => branches.push(join(atoms)),
        }
    }

    if !class_members.is_empty() {
        class_members.sort();
        let class = if class_members.len() > 1 {
            character_class(&class_members)
        } else {
            class_members.remove(0)
        };
        branches.insert(0, class);
    }

    let expr = match branches.len() {
        0 => return Atom::default(),
        1 => branches.remove(0),
        _ => format_compact!("(?:{})", branches.join("|")),
    };

    if optional { make_optional(&expr) } else { expr }
}

/// Apply the `?` quantifier to a whole expression.
///
/// The expression is wrapped in a non-capturing group first, unless it is
/// already a single atomic unit.
pub(crate) fn make_optional(expr: &str) -> Atom {
    let mut optional = if is_atomic(expr) {
        Atom::from(expr)
    } else {
        format_compact!("(?:{expr})")
    };
    optional.push('?');
    optional
}

/// Is `expr` one symbol, one bracket expression, or one non-capturing group?
fn is_atomic(expr: &str) -> bool {
    let mut chars = expr.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(_), None, _) | (Some('\\'), Some(_), None) => return true,
        (Some('[' | '('), Some(_), _) => (),
        _ => return false,
    }

    let Ok(tokens) = tokenize_body(expr) else {
        return false;
    };
    let Some(first) = tokens.first() else {
        return false;
    };

    match &first.item {
        TokenItem::CharacterClass { quantifiers, .. } => {
            tokens.len() == 1 && first.end() == expr.len() && quantifiers.is_empty()
        }
        TokenItem::GroupStart(start) if start.kind == GroupKind::NonCapturing => {
            let last = &tokens[tokens.len() - 1];
            start.end_token == tokens.len() - 1
                && last.end() == expr.len()
                && matches!(&last.item, TokenItem::GroupEnd(end) if end.quantifiers.is_empty())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::char_class::escape_symbol;

    fn chains(words: &[&str]) -> Vec<Chain> {
        words
            .iter()
            .map(|w| w.chars().map(escape_symbol).collect())
            .collect()
    }

    fn merge_words(words: &[&str]) -> Atom {
        let merged = ChainMerger::default().merge(chains(words)).unwrap();
        assemble(vec![merged], false)
    }

    #[test]
    fn test_remove_common_prefix() {
        let mut cs = chains(&["cat", "car", "cab"]);
        assert_eq!(remove_common_prefix(&mut cs), vec!["c", "a"]);
        assert_eq!(cs, chains(&["t", "r", "b"]));

        let mut cs = chains(&["x", "y"]);
        assert!(remove_common_prefix(&mut cs).is_empty());
        assert_eq!(cs, chains(&["x", "y"]));
    }

    #[test]
    fn test_remove_common_suffix() {
        let mut cs = chains(&["bar", "car"]);
        assert_eq!(remove_common_suffix(&mut cs), vec!["a", "r"]);
        assert_eq!(cs, chains(&["b", "c"]));

        // Unequal lengths: bounded by the shortest chain.
        let mut cs = chains(&["ab", "b"]);
        assert_eq!(remove_common_suffix(&mut cs), vec!["b"]);
        assert_eq!(cs, chains(&["a", ""]));

        // Equal lengths: never consume a whole chain.
        let mut cs = chains(&["a", "a"]);
        assert!(remove_common_suffix(&mut cs).is_empty());
    }

    #[test]
    fn test_merge_single_and_identical() {
        assert_eq!(merge_words(&["foo"]), "foo");
        assert_eq!(merge_words(&["foo", "foo"]), "foo");
        assert_eq!(merge_words(&[""]), "");
    }

    #[test]
    fn test_merge_character_class() {
        assert_eq!(merge_words(&["a", "b", "c"]), "[abc]");
        assert_eq!(merge_words(&["car", "cat"]), "ca[rt]");
        assert_eq!(merge_words(&["bar", "car"]), "[bc]ar");
    }

    #[test]
    fn test_merge_alternation() {
        assert_eq!(merge_words(&["bar", "foo"]), "(?:bar|foo)");
    }

    #[test]
    fn test_merge_optional() {
        assert_eq!(merge_words(&["a", "ab"]), "ab?");
        assert_eq!(merge_words(&["ab", "b"]), "a?b");
        assert_eq!(merge_words(&["apple", "applet"]), "applet?");
        assert_eq!(merge_words(&["foo", "foobar", "foobaz"]), "foo(?:ba[rz])?");
    }

    #[test]
    fn test_merge_tails() {
        assert_eq!(merge_words(&["ax", "ay", "bx", "by", "c"]), "(?:c|[ab][xy])");
    }

    #[test]
    fn test_fold_into_existing_class_group() {
        let class: Atom = "[ab]".into();
        let mut groups: Vec<(Atom, Vec<Chain>)> = vec![
            ("a".into(), vec![vec!["a".into()]]),
            (class.clone(), vec![vec![class.clone(), "x".into()]]),
            ("b".into(), vec![vec!["b".into()]]),
            ("c".into(), vec![vec!["c".into(), "d".into()], vec!["c".into()]]),
        ];
        fold_single_symbol_groups(&mut groups);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, class);
        assert_eq!(
            groups[0].1,
            vec![vec![class.clone(), "x".into()], vec![class.clone()]]
        );
        assert_eq!(groups[1].0, "c");
    }

    #[test]
    fn test_merge_with_class_special_char() {
        let x: Atom = "[ab]".into();
        let chains = vec![
            vec!["a".into()],
            vec!["b".into()],
            vec![x.clone(), "y".into()],
            vec!["c".into(), "d".into()],
            vec!["c".into()],
        ];
        let merged = ChainMerger::default().merge(chains).unwrap();
        assert_eq!(assemble(vec![merged], false), "(?:[ab]y?|cd?)");
    }

    #[test]
    fn test_recursion_limit() {
        let merger = ChainMerger::new(0);
        assert_eq!(
            merger.merge(chains(&["ax", "ay", "b"])),
            Err(PatternError::RecursionLimit { limit: 0 })
        );

        // No branching below the top level needs no recursion.
        assert!(merger.merge(chains(&["car", "cat"])).is_ok());
    }

    #[test]
    fn test_assemble() {
        assert_eq!(assemble(chains(&["b", "a", "xy"]), false), "(?:[ab]|xy)");
        assert_eq!(assemble(chains(&["b", ""]), false), "b?");
        assert_eq!(assemble(chains(&["xy", ""]), false), "(?:xy)?");
        assert_eq!(assemble(chains(&["a"]), true), "a?");
        assert_eq!(assemble(vec![], false), "");
    }

    #[test]
    fn test_make_optional() {
        assert_eq!(make_optional("a"), "a?");
        assert_eq!(make_optional("é"), "é?");
        assert_eq!(make_optional("\\."), "\\.?");
        assert_eq!(make_optional("ab"), "(?:ab)?");
        assert_eq!(make_optional("[ab]"), "[ab]?");
        assert_eq!(make_optional("[ab]c"), "(?:[ab]c)?");
        assert_eq!(make_optional("[ab]+"), "(?:[ab]+)?");
        assert_eq!(make_optional("(?:a|b)"), "(?:a|b)?");
        assert_eq!(make_optional("(?:a|b)c"), "(?:(?:a|b)c)?");
        assert_eq!(make_optional("(?:a)(?:b)"), "(?:(?:a)(?:b))?");
        assert_eq!(make_optional("(ab)"), "(?:(ab))?");
    }
}
