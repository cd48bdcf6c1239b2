//! Index rendering: drives materialized entries through the style's
//! templates into output markup.
//!
//! The renderer is a small state machine: emit the style prefix, walk the
//! entries column by column emitting cycling wrappers and per-level
//! templates, then emit the postfix. An empty index short-circuits to the
//! style's empty message after the prefix. Pure string accumulation, no
//! I/O.

use crate::attr::AttrMap;
use crate::columns::Layout;
use crate::diag::Diagnostics;
use crate::entries::RenderEntry;
use crate::style::Style;
use crate::template::Template;

/// Context for rendering one index instance at one render marker.
pub struct RenderContext<'a> {
    style: &'a Style,
    layout: &'a Layout,
    /// Keyword attributes from the render marker, an attribute source for
    /// every template in this index.
    here_attrs: &'a AttrMap,
    constants: &'a AttrMap,
    /// 1-based minimum hierarchy level; components below it are not
    /// rendered as internal text.
    min_level: usize,
    line: Option<usize>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        style: &'a Style,
        layout: &'a Layout,
        here_attrs: &'a AttrMap,
        constants: &'a AttrMap,
        min_level: usize,
        line: Option<usize>,
    ) -> Self {
        Self {
            style,
            layout,
            here_attrs,
            constants,
            min_level: min_level.max(1),
            line,
        }
    }

    /// Render the style's prefix and empty message only.
    pub fn render_empty(&self, diag: &mut Diagnostics) -> String {
        let mut out = String::new();
        self.emit(&mut out, &self.style.prefix, &[], None, diag);
        self.emit(&mut out, &self.style.empty_message, &[], None, diag);
        out
    }

    /// Render the full index.
    pub fn render(&self, entries: &[RenderEntry], diag: &mut Diagnostics) -> String {
        let mut out = String::new();
        self.emit(&mut out, &self.style.prefix, &[], None, diag);

        let mut columns = self.layout.columns.iter();
        let mut column = columns.next();
        let mut column_no = 0usize;
        let mut entry_no = 0usize;
        for (i, entry) in entries.iter().enumerate() {
            if let Some(&(start, _)) = column
                && i == start
            {
                self.emit(&mut out, self.column_wrapper(column_no).0, &[], None, diag);
            }

            if entry.path.depth() > self.style.levels.len() {
                diag.warn(
                    self.line,
                    format!(
                        "not enough style levels for term '{}', entry skipped",
                        entry.path
                    ),
                );
            } else {
                let (entry_start, entry_end) = self.entry_wrapper(entry_no);
                self.emit(&mut out, entry_start, &[], None, diag);
                self.render_entry(&mut out, entry, diag);
                self.emit(&mut out, entry_end, &[], None, diag);
                entry_no += 1;
            }

            if let Some(&(_, end)) = column
                && i == end
            {
                self.emit(&mut out, self.column_wrapper(column_no).1, &[], None, diag);
                column_no += 1;
                column = columns.next();
            }
        }

        self.emit(&mut out, &self.style.postfix, &[], None, diag);
        out
    }

    fn render_entry(&self, out: &mut String, entry: &RenderEntry, diag: &mut Diagnostics) {
        let components = entry.path.components();
        let last_index = components.len() - 1;
        let from = (self.min_level - 1).min(last_index);

        // internal components from the minimum level, each through its
        // depth's template
        for (component, level) in components[from..last_index]
            .iter()
            .zip(&self.style.levels[from..])
        {
            self.emit(
                out,
                &level.text_internal,
                &[("ixterm", component.as_str())],
                None,
                diag,
            );
        }

        let level = &self.style.levels[last_index];
        let last = entry.path.last();

        if !entry.pure_target
            && let Some((id, attrs)) = entry.targets.only()
        {
            // single target: the term text links to its anchor
            let id = id.to_string();
            let text = attrs.get("text").map(String::as_str).unwrap_or(last);
            self.emit(
                out,
                &level.link_last,
                &[("ixterm", last), ("ixtgt", &id), ("ixtext", text)],
                Some(attrs),
                diag,
            );
            return;
        }

        // zero or several targets, or a split entry: plain term text
        self.emit(out, &level.text_last, &[("ixterm", last)], None, diag);
        if entry.targets.len() > 1 || entry.pure_target {
            for (id, attrs) in entry.targets.iter() {
                let id = id.to_string();
                let text = attrs.get("text").map(String::as_str).unwrap_or(last);
                self.emit(
                    out,
                    &level.multi_target,
                    &[("ixterm", last), ("ixtgt", &id), ("ixtext", text)],
                    Some(attrs),
                    diag,
                );
            }
        }
    }

    fn entry_wrapper(&self, entry_no: usize) -> (&'a Template, &'a Template) {
        let wrappers = &self.layout.entry_wrappers;
        let pair = &wrappers[entry_no % wrappers.len()];
        (&pair.0, &pair.1)
    }

    fn column_wrapper(&self, column_no: usize) -> (&'a Template, &'a Template) {
        let wrappers = &self.layout.column_wrappers;
        let pair = &wrappers[column_no % wrappers.len()];
        (&pair.0, &pair.1)
    }

    /// Render one template with the resolution chain for this index:
    /// overrides, then the target's attributes (when given), then the
    /// render marker's attributes, then the constant table.
    fn emit(
        &self,
        out: &mut String,
        template: &Template,
        overrides: &[(&str, &str)],
        target_attrs: Option<&AttrMap>,
        diag: &mut Diagnostics,
    ) {
        match target_attrs {
            Some(target_attrs) => template.render(
                out,
                overrides,
                &[target_attrs, self.here_attrs],
                self.constants,
                self.line,
                diag,
            ),
            None => template.render(
                out,
                overrides,
                &[self.here_attrs],
                self.constants,
                self.line,
                diag,
            ),
        }
    }
}
