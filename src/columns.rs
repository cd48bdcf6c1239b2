//! Collimation: splitting the entry list into balanced columns.
//!
//! A render marker's `cols` attribute asks for the index in N columns. The
//! entry list splits as evenly as possible; with a break depth given, each
//! column boundary shifts to the nearest entry at or above that hierarchy
//! level so a grouped sub-tree is not cut across two columns when a cleaner
//! break exists nearby.

use crate::diag::Diagnostics;
use crate::entries::RenderEntry;
use crate::style::Style;
use crate::template::Template;

/// Balancing mode tag from the column spec.
///
/// Only `lc` (length-balanced, column-major) has defined behavior; the
/// other combinations are accepted syntax that currently falls back to
/// `lc` with a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColMode {
    LengthColumn,
    LengthRow,
    IndexColumn,
    IndexRow,
}

/// A parsed `cols` attribute: `N(i|l)(r|c)[.breakDepth]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColSpec {
    pub count: usize,
    pub mode: ColMode,
    pub break_depth: Option<usize>,
}

impl ColSpec {
    /// Parse a column spec. `None` for anything malformed (zero columns
    /// included); the caller renders that marker uncollimated.
    pub fn parse(spec: &str) -> Option<Self> {
        let digits = spec.chars().take_while(char::is_ascii_digit).count();
        let count: usize = spec[..digits].parse().ok().filter(|&n| n > 0)?;
        let rest = &spec[digits..];
        let mut chars = rest.chars();
        let mode = match (chars.next()?, chars.next()?) {
            ('l', 'c') => ColMode::LengthColumn,
            ('l', 'r') => ColMode::LengthRow,
            ('i', 'c') => ColMode::IndexColumn,
            ('i', 'r') => ColMode::IndexRow,
            _ => return None,
        };
        let break_depth = match chars.next() {
            None => None,
            // one separator character, then the depth
            Some(_) => Some(chars.as_str().parse().ok()?),
        };
        Some(Self {
            count,
            mode,
            break_depth,
        })
    }
}

/// The collimator's output: inclusive entry ranges per column plus the
/// wrapper template pairs to cycle over entries and columns.
#[derive(Debug)]
pub struct Layout {
    /// Inclusive (start, end) entry indices per column.
    pub columns: Vec<(usize, usize)>,
    pub entry_wrappers: Vec<(Template, Template)>,
    pub column_wrappers: Vec<(Template, Template)>,
}

/// Split `entries` into columns according to `spec`.
///
/// Without a spec this is the identity layout: one column spanning all
/// entries, wrapped by the style's plain entry templates. With a spec the
/// style's cycling row/column wrapper lists take over.
pub fn collimate(
    entries: &[RenderEntry],
    spec: Option<ColSpec>,
    style: &Style,
    line: Option<usize>,
    diag: &mut Diagnostics,
) -> Layout {
    let Some(spec) = spec else {
        return single_column(entries, style);
    };
    if spec.mode != ColMode::LengthColumn {
        diag.warn(line, "only the 'lc' column mode is implemented, using it");
    }

    let total = entries.len();
    let base = total / spec.count;
    let extra = total % spec.count;
    let sizes: Vec<usize> = (0..spec.count)
        .map(|i| base + usize::from(i < extra))
        .collect();

    let mut columns = Vec::with_capacity(spec.count);
    let mut start = 0;
    for (i, &size) in sizes.iter().enumerate() {
        // each boundary is measured from the previous (possibly adjusted)
        // cut; the last column absorbs whatever slack the adjustments left
        let mut cut = if i + 1 == spec.count {
            total
        } else {
            start + size
        };
        if let Some(depth) = spec.break_depth
            && i + 1 < spec.count
        {
            cut = adjust_cut(entries, start + size, size, sizes[i + 1], depth);
        }
        let cut = cut.clamp(start, total);
        if cut > start {
            columns.push((start, cut - 1));
        }
        start = cut;
    }

    Layout {
        columns,
        entry_wrappers: wrapper_pairs(&style.row_starts, &style.row_ends),
        column_wrappers: wrapper_pairs(&style.col_starts, &style.col_ends),
    }
}

fn single_column(entries: &[RenderEntry], style: &Style) -> Layout {
    let columns = if entries.is_empty() {
        Vec::new()
    } else {
        vec![(0, entries.len() - 1)]
    };
    Layout {
        columns,
        entry_wrappers: vec![(style.entry_start.clone(), style.entry_end.clone())],
        column_wrappers: vec![(Template::default(), Template::default())],
    }
}

fn wrapper_pairs(starts: &[Template], ends: &[Template]) -> Vec<(Template, Template)> {
    starts
        .iter()
        .zip(ends)
        .map(|(s, e)| (s.clone(), e.clone()))
        .collect()
}

/// Find a break point for one column boundary.
///
/// A forward and a backward cursor step out from the nominal boundary in
/// lockstep, each bounded by half the neighboring column's size. The first
/// position whose entry sits at or above the break depth wins, the backward
/// cursor preferred; an exhausted window keeps the nominal boundary.
fn adjust_cut(
    entries: &[RenderEntry],
    nominal: usize,
    size_left: usize,
    size_right: usize,
    break_depth: usize,
) -> usize {
    let legal = |i: usize| {
        entries
            .get(i)
            .is_some_and(|e| e.path.depth() <= break_depth)
    };
    let forward_max = nominal + size_right / 2;
    let backward_min = nominal.saturating_sub(size_left / 2);
    let mut forward = nominal;
    let mut backward = nominal;
    loop {
        if legal(backward) {
            return backward;
        }
        if legal(forward) {
            return forward;
        }
        if forward >= forward_max && backward <= backward_min {
            return nominal;
        }
        forward += 1;
        backward = backward.saturating_sub(1);
    }
}
