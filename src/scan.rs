//! Marker scanning and the two-pass document pipeline.
//!
//! Markers ride inside HTML-comment-like tokens so untouched backends pass
//! them through unchanged:
//!
//! - `<!-- ix NAME <ATTRS> -->` declares one target under index NAME
//! - `<!-- ixhere NAME <ATTRS> -->` is replaced by the rendered index
//!
//! Scan 1 ([`IndexSet::collect`]) builds the full index model before any
//! output is produced, because a render marker may reference targets
//! declared after it. Scan 2 copies the document through, replacing term
//! markers with anchor markup and render markers with rendered indices.

use std::collections::HashMap;

use memchr::memmem;

use crate::attr::{AttrMap, parse_attr_list};
use crate::columns::{ColSpec, collimate};
use crate::diag::Diagnostics;
use crate::entries::{LevelWindow, filter_levels, materialize};
use crate::index::{Index, IndexSet, TargetId, Term};
use crate::render::RenderContext;
use crate::settings::Settings;
use crate::style::{Backend, StyleTable};
use crate::template::{Template, builtin_constants};

const MARKER_OPEN: &str = "<!-- ix";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `<!-- ix ... -->`: one target occurrence.
    Term,
    /// `<!-- ixhere ... -->`: render the index here.
    Here,
}

/// One recognized marker within a line.
#[derive(Debug, Clone, Copy)]
pub struct Marker<'a> {
    pub kind: MarkerKind,
    /// The index name the marker addresses.
    pub index: &'a str,
    /// Raw attribute list text between the angle brackets.
    pub attrs: &'a str,
    /// Byte range of the whole marker within the line.
    pub start: usize,
    pub end: usize,
}

/// All markers in a line, left to right.
pub fn line_markers(line: &str) -> Vec<Marker<'_>> {
    let mut markers = Vec::new();
    let mut pos = 0;
    while let Some(found) = memmem::find(line[pos..].as_bytes(), MARKER_OPEN.as_bytes()) {
        let start = pos + found;
        match parse_marker(line, start) {
            Some(marker) => {
                pos = marker.end;
                markers.push(marker);
            }
            // not a well-formed marker, keep scanning after the open token
            None => pos = start + MARKER_OPEN.len(),
        }
    }
    markers
}

/// Parse one marker starting at `start` (which points at `<!-- ix`).
///
/// The shape is rigid: `<!-- ix NAME <ATTRS> -->` with single spaces, a
/// non-empty whitespace-free NAME, and ATTRS free of `>`.
fn parse_marker(line: &str, start: usize) -> Option<Marker<'_>> {
    let mut cursor = start + MARKER_OPEN.len();
    let rest = &line[cursor..];
    let kind = if rest.starts_with("here ") {
        cursor += "here ".len();
        MarkerKind::Here
    } else if rest.starts_with(' ') {
        cursor += 1;
        MarkerKind::Term
    } else {
        return None;
    };

    let name_len = line[cursor..]
        .find(|c: char| c.is_whitespace() || c == '<')
        .unwrap_or(line.len() - cursor);
    if name_len == 0 {
        return None;
    }
    let index = &line[cursor..cursor + name_len];
    cursor += name_len;

    let after_name = &line[cursor..];
    if !after_name.starts_with(" <") {
        return None;
    }
    cursor += 2;

    let attrs_len = line[cursor..].find('>')?;
    let attrs = &line[cursor..cursor + attrs_len];
    cursor += attrs_len;

    if !line[cursor..].starts_with("> -->") {
        return None;
    }
    cursor += "> -->".len();

    Some(Marker {
        kind,
        index,
        attrs,
        start,
        end: cursor,
    })
}

/// The document processor: loaded configuration plus the chosen backend.
///
/// All state the pipeline needs lives here explicitly; nothing is global,
/// so independent documents and tests never share styles or indices.
pub struct Processor {
    backend: Backend,
    styles: StyleTable,
    /// Anchor snippet per backend name.
    anchors: HashMap<String, Template>,
    /// Constant attribute table (`sp`, `nl`, configured `attributes.*`).
    constants: AttrMap,
}

impl Processor {
    /// Build a processor from loaded configuration.
    pub fn from_settings(backend: Backend, settings: &Settings) -> Self {
        let mut anchors = HashMap::new();
        if let Some(tree) = settings.child(&["anchors"]) {
            for (name, node) in tree.children() {
                anchors.insert(name.to_string(), Template::parse(node.value().unwrap_or("")));
            }
        }
        let mut constants = builtin_constants();
        if let Some(tree) = settings.child(&["attributes"]) {
            for (name, node) in tree.children() {
                constants.insert(name.to_string(), node.value().unwrap_or("").to_string());
            }
        }
        Self {
            backend,
            styles: StyleTable::from_settings(settings),
            anchors,
            constants,
        }
    }

    /// Run both passes over a document, returning the output text.
    ///
    /// The input is processed to completion; every recoverable problem
    /// lands in `diag` rather than aborting.
    pub fn process(&self, input: &str, diag: &mut Diagnostics) -> String {
        let indices = IndexSet::collect(input, diag);
        self.emit_document(input, &indices, diag)
    }

    /// Scan 2: copy the document through, replacing markers.
    fn emit_document(&self, input: &str, indices: &IndexSet, diag: &mut Diagnostics) -> String {
        let mut out = String::with_capacity(input.len());
        // target ids are re-derived with the same counter walk as scan 1
        let mut next_id: TargetId = 1;
        let mut here_count = 0usize;
        for (lineno, line) in input.split_inclusive('\n').enumerate() {
            let lineno = lineno + 1;
            let mut upto = 0;
            for marker in line_markers(line) {
                out.push_str(&line[upto..marker.start]);
                upto = marker.end;
                match marker.kind {
                    MarkerKind::Term => {
                        self.emit_anchor(&mut out, &marker, &mut next_id, lineno, diag);
                    }
                    MarkerKind::Here => {
                        here_count += 1;
                        self.emit_index(&mut out, &marker, indices, lineno, diag);
                    }
                }
            }
            out.push_str(&line[upto..]);
        }
        diag.info(None, format!("pass 2 rendered {here_count} index markers"));
        out
    }

    /// Replace a term marker with the backend's anchor snippet.
    fn emit_anchor(
        &self,
        out: &mut String,
        marker: &Marker<'_>,
        next_id: &mut TargetId,
        lineno: usize,
        diag: &mut Diagnostics,
    ) {
        let (components, attrs) = parse_attr_list(marker.attrs);
        let Some(last) = components.last().map(String::as_str) else {
            // scan 1 already diagnosed this marker; no id was assigned
            return;
        };
        let id = next_id.to_string();
        *next_id += 1;
        let text = attrs.get("text").map(String::as_str).unwrap_or(last);
        let Some(anchor) = self.anchors.get(self.backend.name()) else {
            diag.warn(
                Some(lineno),
                format!("no anchor defined for backend '{}'", self.backend.name()),
            );
            return;
        };
        anchor.render(
            out,
            &[("ixtgt", &id), ("ixtext", text)],
            &[&attrs],
            &self.constants,
            Some(lineno),
            diag,
        );
    }

    /// Replace a render marker with the rendered index.
    fn emit_index(
        &self,
        out: &mut String,
        marker: &Marker<'_>,
        indices: &IndexSet,
        lineno: usize,
        diag: &mut Diagnostics,
    ) {
        let (selector, here_attrs) = parse_attr_list(marker.attrs);
        let style_name = here_attrs
            .get("style")
            .map(String::as_str)
            .unwrap_or(&self.styles.default_style);
        let Some(style) = self
            .styles
            .lookup(style_name, self.backend, Some(lineno), diag)
        else {
            return;
        };

        let empty_index = Index::default();
        let index = indices.get(marker.index).unwrap_or(&empty_index);

        let window = here_attrs
            .get("levels")
            .map(|spec| LevelWindow::parse(spec))
            .unwrap_or_default();
        let col_spec = here_attrs.get("cols").and_then(|spec| {
            let parsed = ColSpec::parse(spec);
            if parsed.is_none() {
                diag.warn(
                    Some(lineno),
                    format!("unrecognised column attribute '{spec}', not collimated"),
                );
            }
            parsed
        });

        if index.is_empty() {
            let layout = collimate(&[], None, style, Some(lineno), diag);
            let ctx = RenderContext::new(
                style,
                &layout,
                &here_attrs,
                &self.constants,
                window.min,
                Some(lineno),
            );
            out.push_str(&ctx.render_empty(diag));
            return;
        }

        let terms: Vec<&Term> = index
            .terms()
            .filter(|term| term.matches_prefix(&selector))
            .collect();
        let entries = materialize(&terms, index, style.completion);
        let entries = filter_levels(entries, window);
        let layout = collimate(&entries, col_spec, style, Some(lineno), diag);
        let ctx = RenderContext::new(
            style,
            &layout,
            &here_attrs,
            &self.constants,
            window.min,
            Some(lineno),
        );
        out.push_str(&ctx.render(&entries, diag));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_marker_parses() {
        let line = "before <!-- ix main <Fruit,Apple,text=apples> --> after";
        let markers = line_markers(line);
        assert_eq!(markers.len(), 1);
        let m = &markers[0];
        assert_eq!(m.kind, MarkerKind::Term);
        assert_eq!(m.index, "main");
        assert_eq!(m.attrs, "Fruit,Apple,text=apples");
        assert_eq!(&line[m.start..m.end], "<!-- ix main <Fruit,Apple,text=apples> -->");
    }

    #[test]
    fn test_here_marker_parses() {
        let markers = line_markers("<!-- ixhere main <style=simple-grouped> -->");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, MarkerKind::Here);
        assert_eq!(markers[0].index, "main");
        assert_eq!(markers[0].attrs, "style=simple-grouped");
    }

    #[test]
    fn test_multiple_markers_per_line() {
        let line = "<!-- ix a <X> --> mid <!-- ix b <Y> -->";
        let markers = line_markers(line);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].index, "a");
        assert_eq!(markers[1].index, "b");
    }

    #[test]
    fn test_malformed_marker_ignored() {
        assert!(line_markers("<!-- ix noattrs -->").is_empty());
        assert!(line_markers("<!-- ix  <double,space> -->").is_empty());
        assert!(line_markers("<!-- ixhere main <unterminated -->").is_empty());
        assert!(line_markers("plain text").is_empty());
    }

    #[test]
    fn test_empty_attr_list_parses() {
        let markers = line_markers("<!-- ixhere main <> -->");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].attrs, "");
    }
}
