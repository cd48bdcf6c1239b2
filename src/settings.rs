//! Hierarchical key=value configuration tree.
//!
//! Style definitions load from a layered text format: built-in defaults are
//! parsed first, then any user-supplied files on top, later values
//! overwriting earlier ones at the same key path.
//!
//! Format:
//! - `#` starts a comment line; blank lines are ignored
//! - `dotted.key.path = value` sets a leaf (whitespace around `=` trimmed)
//! - `[dotted.prefix]` prepends a prefix to all following keys
//! - a value ending in `\` continues on the next line (trimmed)

use std::collections::BTreeMap;

use crate::diag::Diagnostics;

/// One node of the configuration tree: an optional leaf value plus
/// key-ordered children.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    value: Option<String>,
    children: BTreeMap<String, Settings>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at a key path, creating intermediate nodes as needed.
    pub fn set(&mut self, path: &[&str], value: impl Into<String>) {
        let mut node = self;
        for key in path {
            node = node.children.entry((*key).to_string()).or_default();
        }
        node.value = Some(value.into());
    }

    /// This node's own leaf value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The value of a direct child, if it has one.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.children.get(key).and_then(|c| c.value())
    }

    /// The value of a direct child, or a default.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Descend a key path, returning the subtree if every level exists.
    pub fn child(&self, path: &[&str]) -> Option<&Settings> {
        let mut node = self;
        for key in path {
            node = node.children.get(*key)?;
        }
        Some(node)
    }

    /// Children in sorted key order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Settings)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Child values in sorted key order (children without a value yield "").
    pub fn key_sorted_values(&self) -> Vec<&str> {
        self.children
            .values()
            .map(|c| c.value().unwrap_or(""))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    /// Parse configuration text into this tree, layering over existing keys.
    ///
    /// A non-comment line with no `=` is skipped with a diagnostic; parsing
    /// itself never fails.
    pub fn parse_str(&mut self, text: &str, diag: &mut Diagnostics) {
        let mut prefix: Vec<String> = Vec::new();
        let mut lines = text.lines().enumerate();
        while let Some((lineno, raw)) = lines.next() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[') {
                let section = section.strip_suffix(']').unwrap_or(section);
                prefix = section.split('.').map(str::to_string).collect();
                continue;
            }
            let Some((key_text, value_text)) = line.split_once('=') else {
                diag.warn(
                    Some(lineno + 1),
                    format!("config line has no '=', ignored: {line}"),
                );
                continue;
            };
            let mut value = value_text.trim().to_string();
            while value.ends_with('\\') {
                value.pop();
                let continuation = lines.next().map(|(_, l)| l.trim()).unwrap_or("");
                value.push_str(continuation);
            }
            let mut path: Vec<&str> = prefix.iter().map(String::as_str).collect();
            path.extend(key_text.trim_end().split('.'));
            self.set(&path, value);
        }
    }
}
