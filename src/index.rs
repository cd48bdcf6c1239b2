//! The in-memory index model built during document scan 1.
//!
//! A document carries any number of named indices (a subject index and a
//! name index, say), each mapping hierarchical [`Term`]s to the set of
//! [`Target`] occurrences declared by term markers. The model is built once
//! by [`IndexSet::collect`] and is read-only during the output pass.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

use crate::attr::{AttrMap, parse_attr_list};
use crate::diag::Diagnostics;
use crate::scan::{MarkerKind, line_markers};

/// Document-wide target occurrence number, assigned in scan order starting
/// at 1 and shared across all index names.
pub type TargetId = u32;

/// An ordered, non-empty hierarchy path identifying one index entry's
/// lineage, e.g. `Animals.Dog.Poodle`.
///
/// Terms order lexicographically component-wise; a shorter prefix sorts
/// before its extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term(pub Vec<String>);

impl Term {
    pub fn new(components: Vec<String>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// Hierarchy depth (number of components).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Final component. Terms are non-empty by construction.
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    /// True if this term's leading components exactly match `prefix`.
    pub fn matches_prefix(&self, prefix: &[String]) -> bool {
        self.0.len() >= prefix.len() && self.0[..prefix.len()] == *prefix
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// The targets recorded for one term, in ascending id (creation) order.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    targets: BTreeMap<TargetId, AttrMap>,
}

impl TargetSet {
    /// A set holding exactly one target.
    pub fn single(id: TargetId, attrs: AttrMap) -> Self {
        let mut targets = BTreeMap::new();
        targets.insert(id, attrs);
        Self { targets }
    }

    pub fn insert(&mut self, id: TargetId, attrs: AttrMap) {
        self.targets.insert(id, attrs);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Targets in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &AttrMap)> {
        self.targets.iter().map(|(id, attrs)| (*id, attrs))
    }

    /// The single target, when exactly one exists.
    pub fn only(&self) -> Option<(TargetId, &AttrMap)> {
        if self.targets.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }
}

/// One named index: a sorted map from term to its target set.
#[derive(Debug, Default)]
pub struct Index {
    terms: BTreeMap<Term, TargetSet>,
}

impl Index {
    pub fn add_target(&mut self, term: Term, id: TargetId, attrs: AttrMap) {
        self.terms.entry(term).or_default().insert(id, attrs);
    }

    /// Terms in sorted order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.keys()
    }

    pub fn targets(&self, term: &Term) -> Option<&TargetSet> {
        self.terms.get(term)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

/// All indices collected from a document, keyed by index name.
#[derive(Debug, Default)]
pub struct IndexSet {
    indices: HashMap<String, Index>,
}

impl IndexSet {
    /// Scan 1: collect every term marker in the document.
    ///
    /// The positional attribute tuple is the term, the keyword attributes
    /// become the target's attribute map. One monotonically increasing
    /// counter assigns target ids across all index names, so ids are unique
    /// per document. A marker with no positional attributes cannot form a
    /// term and is skipped with a diagnostic.
    pub fn collect(input: &str, diag: &mut Diagnostics) -> Self {
        let mut set = IndexSet::default();
        let mut next_id: TargetId = 1;
        let mut found = 0usize;
        for (lineno, line) in input.lines().enumerate() {
            for marker in line_markers(line) {
                if marker.kind != MarkerKind::Term {
                    continue;
                }
                let (components, attrs) = parse_attr_list(marker.attrs);
                if components.is_empty() {
                    diag.warn(
                        Some(lineno + 1),
                        format!("term marker for index '{}' has no term, ignored", marker.index),
                    );
                    continue;
                }
                found += 1;
                set.indices
                    .entry(marker.index.to_string())
                    .or_default()
                    .add_target(Term::new(components), next_id, attrs);
                next_id += 1;
            }
        }
        diag.info(None, format!("pass 1 found {found} term markers"));
        set
    }

    pub fn get(&self, name: &str) -> Option<&Index> {
        self.indices.get(name)
    }
}
