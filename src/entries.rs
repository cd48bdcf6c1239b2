//! Entry materialization: from matching terms to the ordered list of
//! renderable entries.
//!
//! This is where completion policy applies. A grouped style needs an entry
//! for every implied ancestor heading, so `Animals.Dog.Poodle` under an
//! otherwise empty index materializes `Animals` and `Animals.Dog` entries
//! with no targets; a splitting style turns one term with several targets
//! into one pure-target entry per target.

use crate::index::{Index, Term, TargetSet};
use crate::style::Completion;

/// One materialized unit for the renderer.
#[derive(Debug, Clone)]
pub struct RenderEntry {
    pub path: Term,
    /// Empty for synthesized ancestor entries.
    pub targets: TargetSet,
    /// A multi-target split entry: the term label renders as plain text
    /// followed by this entry's own target link, never as `link_last`.
    pub pure_target: bool,
}

impl RenderEntry {
    fn synthesized(path: Term) -> Self {
        Self {
            path,
            targets: TargetSet::default(),
            pure_target: false,
        }
    }
}

/// Materialize sorted terms into the final ordered entry list.
///
/// Guarantees: output is sorted by path; every synthesized ancestor appears
/// exactly once, immediately before its first descendant; descendants of
/// different ancestors never interleave. A term that is itself a prefix of
/// another term is never synthesized a second time.
pub fn materialize(terms: &[&Term], index: &Index, mode: Completion) -> Vec<RenderEntry> {
    let mut entries = Vec::with_capacity(terms.len());
    let mut previous: &[String] = &[];
    for term in terms {
        let components = term.components();
        if mode != Completion::None {
            // synthesize ancestors between the shared prefix and this term
            let mut depth = shared_prefix_len(previous, components);
            while depth + 1 < components.len() {
                depth += 1;
                entries.push(RenderEntry::synthesized(Term::new(
                    components[..depth].to_vec(),
                )));
            }
        }
        let targets = index.targets(term).cloned().unwrap_or_default();
        if mode == Completion::Split && targets.len() > 1 {
            for (id, attrs) in targets.iter() {
                entries.push(RenderEntry {
                    path: (*term).clone(),
                    targets: TargetSet::single(id, attrs.clone()),
                    pure_target: true,
                });
            }
        } else {
            entries.push(RenderEntry {
                path: (*term).clone(),
                targets,
                pure_target: false,
            });
        }
        previous = components;
    }
    entries
}

fn shared_prefix_len(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// A `min-max` hierarchy-depth window: minimum inclusive, maximum
/// exclusive. Either side may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelWindow {
    /// 1-based minimum depth, inclusive.
    pub min: usize,
    /// Exclusive maximum depth; `None` is unbounded.
    pub max: Option<usize>,
}

impl Default for LevelWindow {
    fn default() -> Self {
        Self { min: 1, max: None }
    }
}

impl LevelWindow {
    /// Parse a `levels` attribute value. Unparsable pieces keep their
    /// defaults (min 1, max unbounded).
    pub fn parse(spec: &str) -> Self {
        let (min_text, max_text) = match spec.split_once('-') {
            Some((min, max)) => (min, max),
            None => (spec, ""),
        };
        Self {
            min: min_text.trim().parse().unwrap_or(1),
            max: max_text.trim().parse().ok(),
        }
    }

    pub fn contains(&self, depth: usize) -> bool {
        depth >= self.min && self.max.is_none_or(|max| depth < max)
    }
}

/// Drop entries whose path depth falls outside the window.
pub fn filter_levels(entries: Vec<RenderEntry>, window: LevelWindow) -> Vec<RenderEntry> {
    entries
        .into_iter()
        .filter(|entry| window.contains(entry.path.depth()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrMap;

    fn term(path: &[&str]) -> Term {
        Term::new(path.iter().map(|s| s.to_string()).collect())
    }

    fn index_of(terms: &[(&[&str], usize)]) -> Index {
        let mut index = Index::default();
        let mut id = 1;
        for (path, count) in terms {
            for _ in 0..*count {
                index.add_target(term(path), id, AttrMap::new());
                id += 1;
            }
        }
        index
    }

    fn paths(entries: &[RenderEntry]) -> Vec<String> {
        entries.iter().map(|e| e.path.to_string()).collect()
    }

    #[test]
    fn test_mode_none_is_identity() {
        let index = index_of(&[(&["A", "B", "C"], 1), (&["D"], 1)]);
        let terms: Vec<&Term> = index.terms().collect();
        let entries = materialize(&terms, &index, Completion::None);
        assert_eq!(paths(&entries), vec!["A.B.C", "D"]);
        assert!(entries.iter().all(|e| !e.pure_target));
    }

    #[test]
    fn test_expand_parents_synthesizes_ancestors() {
        let index = index_of(&[(&["A", "B", "C"], 1), (&["A", "D"], 1)]);
        let terms: Vec<&Term> = index.terms().collect();
        let entries = materialize(&terms, &index, Completion::Parents);
        assert_eq!(paths(&entries), vec!["A", "A.B", "A.B.C", "A.D"]);
        // synthesized ancestors carry no targets
        assert!(entries[0].targets.is_empty());
        assert!(entries[1].targets.is_empty());
        assert!(!entries[2].targets.is_empty());
    }

    #[test]
    fn test_existing_prefix_term_not_resynthesized() {
        let index = index_of(&[(&["A"], 1), (&["A", "B"], 1)]);
        let terms: Vec<&Term> = index.terms().collect();
        let entries = materialize(&terms, &index, Completion::Parents);
        assert_eq!(paths(&entries), vec!["A", "A.B"]);
        // the real A entry kept its target
        assert_eq!(entries[0].targets.len(), 1);
    }

    #[test]
    fn test_split_mode_expands_multi_target_terms() {
        let index = index_of(&[(&["A", "B"], 3), (&["C"], 1)]);
        let terms: Vec<&Term> = index.terms().collect();
        let entries = materialize(&terms, &index, Completion::Split);
        assert_eq!(paths(&entries), vec!["A", "A.B", "A.B", "A.B", "C"]);
        let split: Vec<_> = entries.iter().filter(|e| e.pure_target).collect();
        assert_eq!(split.len(), 3);
        // one target each, in ascending id order
        let ids: Vec<_> = split
            .iter()
            .map(|e| e.targets.iter().next().unwrap().0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // single-target term stays a normal entry
        assert!(!entries[4].pure_target);
    }

    #[test]
    fn test_materialize_output_sorted() {
        let index = index_of(&[
            (&["B"], 1),
            (&["A", "X", "Y"], 1),
            (&["A", "X"], 1),
            (&["A"], 1),
        ]);
        let terms: Vec<&Term> = index.terms().collect();
        let entries = materialize(&terms, &index, Completion::Parents);
        let mut sorted = paths(&entries);
        sorted.sort();
        assert_eq!(paths(&entries), sorted);
    }

    #[test]
    fn test_level_window_parse() {
        assert_eq!(LevelWindow::parse("2-3"), LevelWindow { min: 2, max: Some(3) });
        assert_eq!(LevelWindow::parse("2"), LevelWindow { min: 2, max: None });
        assert_eq!(LevelWindow::parse("-3"), LevelWindow { min: 1, max: Some(3) });
        assert_eq!(LevelWindow::parse(""), LevelWindow::default());
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_materialize_sorted_with_unique_ancestors(
            raw in prop::collection::btree_set(
                prop::collection::vec(0u8..3, 1..4),
                1..12,
            )
        ) {
            let mut index = Index::default();
            let mut id = 1;
            for path in &raw {
                let components: Vec<String> = path
                    .iter()
                    .map(|c| ((b'a' + c) as char).to_string())
                    .collect();
                index.add_target(Term::new(components), id, AttrMap::new());
                id += 1;
            }
            let terms: Vec<&Term> = index.terms().collect();
            let entries = materialize(&terms, &index, Completion::Parents);

            // strictly ascending paths, so every path appears exactly once
            for pair in entries.windows(2) {
                prop_assert!(pair[0].path < pair[1].path);
            }
            // every ancestor of every entry was emitted before it
            let mut seen = std::collections::BTreeSet::new();
            for entry in &entries {
                for depth in 1..entry.path.depth() {
                    let parent = Term::new(entry.path.components()[..depth].to_vec());
                    prop_assert!(seen.contains(&parent));
                }
                seen.insert(entry.path.clone());
            }
        }

        #[test]
        fn prop_mode_none_emits_exactly_the_terms(
            raw in prop::collection::btree_set(
                prop::collection::vec(0u8..3, 1..4),
                1..12,
            )
        ) {
            let mut index = Index::default();
            let mut id = 1;
            for path in &raw {
                let components: Vec<String> = path
                    .iter()
                    .map(|c| ((b'a' + c) as char).to_string())
                    .collect();
                index.add_target(Term::new(components), id, AttrMap::new());
                id += 1;
            }
            let terms: Vec<&Term> = index.terms().collect();
            let entries = materialize(&terms, &index, Completion::None);
            prop_assert_eq!(entries.len(), terms.len());
            for (entry, term) in entries.iter().zip(&terms) {
                prop_assert_eq!(&entry.path, *term);
                prop_assert!(!entry.pure_target);
            }
        }
    }

    #[test]
    fn test_level_filter_bounds() {
        let index = index_of(&[(&["A"], 1), (&["A", "B"], 1), (&["A", "B", "C"], 1)]);
        let terms: Vec<&Term> = index.terms().collect();
        let entries = materialize(&terms, &index, Completion::None);
        // min inclusive, max exclusive
        let kept = filter_levels(entries, LevelWindow::parse("2-3"));
        assert_eq!(paths(&kept), vec!["A.B"]);
    }
}
