//! Style definitions: how a rendered index looks for one output backend.
//!
//! A style is a tree of templates loaded from configuration: per-level
//! entry templates under `levels.N.*`, whole-index `prefix`/`postfix`/
//! `empty_message`, entry wrappers, and optional cycling column/row wrapper
//! lists. Loading never fails; any absent key silently takes its default.

use std::collections::HashMap;

use crate::diag::Diagnostics;
use crate::settings::Settings;
use crate::template::Template;

/// Canonical output dialects.
///
/// User-facing names go through the alias table: `html` means
/// [`Backend::Xhtml11`] and `docbook` means [`Backend::Docbook45`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Xhtml11,
    Docbook45,
}

impl Backend {
    /// Resolve a backend name, applying aliases. `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "html" | "xhtml11" => Some(Self::Xhtml11),
            "docbook" | "docbook45" => Some(Self::Docbook45),
            _ => None,
        }
    }

    /// The canonical name, as used in style configuration keys.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Xhtml11 => "xhtml11",
            Self::Docbook45 => "docbook45",
        }
    }
}

/// Entry-materialization policy, from a style's `complete` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// One entry per collected term, nothing synthesized.
    #[default]
    None,
    /// Synthesize an entry for every implied ancestor path (`e`).
    Parents,
    /// As `Parents`, and split multi-target terms into one entry per
    /// target (`t`).
    Split,
}

impl Completion {
    fn from_key(key: &str) -> Self {
        if key.starts_with('e') {
            Self::Parents
        } else if key.starts_with('t') {
            Self::Split
        } else {
            Self::None
        }
    }
}

/// Templates for one hierarchy depth.
#[derive(Debug, Clone, Default)]
pub struct EntryStyle {
    /// A non-final component of the path.
    pub text_internal: Template,
    /// The final component when it links to exactly one target.
    pub link_last: Template,
    /// The final component as plain text (zero or several targets).
    pub text_last: Template,
    /// One target link, rendered per target when several exist.
    pub multi_target: Template,
}

impl EntryStyle {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            text_internal: Template::parse(settings.get_or("text_internal", "")),
            link_last: Template::parse(settings.get_or("link_last", "")),
            text_last: Template::parse(settings.get_or("text_last", "")),
            multi_target: Template::parse(settings.get_or("multi_target", "")),
        }
    }
}

/// One rendering style for one backend. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Style {
    pub completion: Completion,
    /// Entry styles by hierarchy depth (index 0 is depth 1).
    pub levels: Vec<EntryStyle>,
    pub prefix: Template,
    pub postfix: Template,
    pub empty_message: Template,
    pub entry_start: Template,
    pub entry_end: Template,
    /// Cycling column/row wrapper template lists, each at least one long.
    pub col_starts: Vec<Template>,
    pub col_ends: Vec<Template>,
    pub row_starts: Vec<Template>,
    pub row_ends: Vec<Template>,
}

impl Style {
    pub fn from_settings(settings: &Settings) -> Self {
        let levels = match settings.child(&["levels"]) {
            Some(levels) => levels
                .children()
                .map(|(_, level)| EntryStyle::from_settings(level))
                .collect(),
            None => Vec::new(),
        };
        Self {
            completion: Completion::from_key(settings.get_or("complete", "n")),
            levels,
            prefix: Template::parse(settings.get_or("prefix", "")),
            postfix: Template::parse(settings.get_or("postfix", "")),
            empty_message: Template::parse(settings.get_or("empty_message", "Empty Index")),
            entry_start: Template::parse(settings.get_or("entry_start", "")),
            entry_end: Template::parse(settings.get_or("entry_end", "")),
            col_starts: template_list(settings, "col_start"),
            col_ends: template_list(settings, "col_end"),
            row_starts: template_list(settings, "row_start"),
            row_ends: template_list(settings, "row_end"),
        }
    }
}

/// A `key.N = markup` list as templates, in sorted key order; defaults to a
/// single empty template so cycling always has something to cycle.
fn template_list(settings: &Settings, key: &str) -> Vec<Template> {
    match settings.child(&[key]) {
        Some(node) if !node.key_sorted_values().is_empty() => node
            .key_sorted_values()
            .into_iter()
            .map(Template::parse)
            .collect(),
        _ => vec![Template::default()],
    }
}

/// All loaded styles, keyed by style name then backend name.
#[derive(Debug, Default)]
pub struct StyleTable {
    styles: HashMap<String, HashMap<String, Style>>,
    pub default_style: String,
}

impl StyleTable {
    /// Project the `styles.*` configuration subtree into typed styles.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut styles: HashMap<String, HashMap<String, Style>> = HashMap::new();
        if let Some(tree) = settings.child(&["styles"]) {
            for (style_name, backends) in tree.children() {
                for (backend_name, definition) in backends.children() {
                    styles
                        .entry(style_name.to_string())
                        .or_default()
                        .insert(backend_name.to_string(), Style::from_settings(definition));
                }
            }
        }
        Self {
            styles,
            default_style: settings.get_or("default_style", "simple-dotted").to_string(),
        }
    }

    /// Look up a style by name for a backend.
    ///
    /// An unknown style name falls back to the default style with a
    /// diagnostic. A style with no definition for the backend returns
    /// `None` with a diagnostic; the caller skips that render marker.
    pub fn lookup(
        &self,
        name: &str,
        backend: Backend,
        line: Option<usize>,
        diag: &mut Diagnostics,
    ) -> Option<&Style> {
        let name = if self.styles.contains_key(name) {
            name
        } else {
            diag.warn(
                line,
                format!("index style '{name}' not found, using '{}'", self.default_style),
            );
            self.default_style.as_str()
        };
        let backends = self.styles.get(name)?;
        let style = backends.get(backend.name());
        if style.is_none() {
            diag.warn(
                line,
                format!(
                    "backend '{}' not defined for style '{name}', index omitted",
                    backend.name()
                ),
            );
        }
        style
    }
}

/// Built-in style definitions, parsed before any user configuration.
pub const BUILTIN_CONFIG: &str = r##"
default_style = simple-dotted

[anchors]
xhtml11 = <a id="ix{ixtgt}"></a>
docbook45 = <anchor id="ix{ixtgt}"/>

[styles.simple-dotted.xhtml11]
levels.1.text_internal = {ixterm}.
levels.1.link_last = <a href="#ix{ixtgt}">{ixterm}</a>
levels.1.text_last = {ixterm}{sp}
levels.1.multi_target = <a href="#ix{ixtgt}">{ixtext} </a>
levels.2.text_internal = {ixterm}.
levels.2.link_last = <a href="#ix{ixtgt}">{ixterm}</a>
levels.2.text_last = {ixterm}{sp}
levels.2.multi_target = <a href="#ix{ixtgt}">{ixtext} </a>
levels.3.text_internal = {ixterm}.
levels.3.link_last = <a href="#ix{ixtgt}">{ixterm}</a>
levels.3.text_last = {ixterm}{sp}
levels.3.multi_target = <a href="#ix{ixtgt}">{ixtext}</a>
entry_start = <p>
entry_end = </p>{nl}

[styles.simple-grouped.xhtml11]
levels.1.text_internal =
levels.1.link_last = <p><a href="#ix{ixtgt}">{ixterm}</a>
levels.1.text_last = <p>{ixterm}{sp}
levels.1.multi_target = <a href="#ix{ixtgt}">{ixtext}</a>{sp}
levels.2.text_internal =
levels.2.link_last = <p style="text-indent:2em;"><a href="#ix{ixtgt}">{ixterm}</a>
levels.2.text_last = <p style="text-indent:2em;">{ixterm}{sp}
levels.2.multi_target = <a href="#ix{ixtgt}">{ixtext}</a>{sp}
levels.3.text_internal =
levels.3.link_last = <p style="text-indent:4em;"><a href="#ix{ixtgt}">{ixterm}</a>
levels.3.text_last = <p style="text-indent:4em;">{ixterm}{sp}
levels.3.multi_target = <a href="#ix{ixtgt}">{ixtext}</a>{sp}
entry_end = </p>{nl}
complete = e

[styles.column-grouped.xhtml11]
levels.1.text_internal =
levels.1.link_last = <p><a href="#ix{ixtgt}">{ixterm}</a>
levels.1.text_last = <p>{ixterm}{sp}
levels.1.multi_target = <a href="#ix{ixtgt}">{ixtext}</a>{sp}
levels.2.text_internal =
levels.2.link_last = <p style="text-indent:2em;"><a href="#ix{ixtgt}">{ixterm}</a>
levels.2.text_last = <p style="text-indent:2em;">{ixterm}{sp}
levels.2.multi_target = <a href="#ix{ixtgt}">{ixtext}</a>{sp}
levels.3.text_internal =
levels.3.link_last = <p style="text-indent:4em;"><a href="#ix{ixtgt}">{ixterm}</a>
levels.3.text_last = <p style="text-indent:4em;">{ixterm}{sp}
levels.3.multi_target = <a href="#ix{ixtgt}">{ixtext}</a>{sp}
prefix = <table width="100%"><tr>
postfix = </tr></table>
col_start.1 = <td valign="top">
col_end.1 = </td>{nl}
row_start.1 =
row_end.1 = </p>{nl}
complete = t
"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_table() -> StyleTable {
        let mut settings = Settings::new();
        let mut diag = Diagnostics::new();
        settings.parse_str(BUILTIN_CONFIG, &mut diag);
        assert!(diag.warnings().count() == 0);
        StyleTable::from_settings(&settings)
    }

    #[test]
    fn test_backend_aliases() {
        assert_eq!(Backend::from_name("html"), Some(Backend::Xhtml11));
        assert_eq!(Backend::from_name("xhtml11"), Some(Backend::Xhtml11));
        assert_eq!(Backend::from_name("docbook"), Some(Backend::Docbook45));
        assert_eq!(Backend::from_name("docbook45"), Some(Backend::Docbook45));
        assert_eq!(Backend::from_name("latex"), None);
    }

    #[test]
    fn test_builtin_styles_load() {
        let table = builtin_table();
        let mut diag = Diagnostics::new();
        let style = table
            .lookup("simple-dotted", Backend::Xhtml11, None, &mut diag)
            .unwrap();
        assert_eq!(style.levels.len(), 3);
        assert_eq!(style.completion, Completion::None);
        assert!(diag.is_empty());

        let grouped = table
            .lookup("simple-grouped", Backend::Xhtml11, None, &mut diag)
            .unwrap();
        assert_eq!(grouped.completion, Completion::Parents);

        let columns = table
            .lookup("column-grouped", Backend::Xhtml11, None, &mut diag)
            .unwrap();
        assert_eq!(columns.completion, Completion::Split);
        assert!(!columns.col_starts[0].is_empty());
    }

    #[test]
    fn test_unknown_style_falls_back_to_default() {
        let table = builtin_table();
        let mut diag = Diagnostics::new();
        let style = table.lookup("no-such-style", Backend::Xhtml11, Some(4), &mut diag);
        assert!(style.is_some());
        assert_eq!(diag.warnings().count(), 1);
    }

    #[test]
    fn test_missing_backend_is_diagnosed() {
        let table = builtin_table();
        let mut diag = Diagnostics::new();
        let style = table.lookup("simple-dotted", Backend::Docbook45, Some(9), &mut diag);
        assert!(style.is_none());
        assert_eq!(diag.warnings().count(), 1);
    }

    #[test]
    fn test_defaults_for_absent_keys() {
        let style = Style::from_settings(&Settings::new());
        assert!(style.levels.is_empty());
        assert_eq!(style.completion, Completion::None);
        assert!(style.prefix.is_empty());
        assert_eq!(style.col_starts.len(), 1);
        assert!(style.col_starts[0].is_empty());
    }

    #[test]
    fn test_user_config_layers_over_builtin() {
        let mut settings = Settings::new();
        let mut diag = Diagnostics::new();
        settings.parse_str(BUILTIN_CONFIG, &mut diag);
        settings.parse_str(
            "[styles.simple-dotted.xhtml11]\nentry_start = <li>\n",
            &mut diag,
        );
        let table = StyleTable::from_settings(&settings);
        let style = table
            .lookup("simple-dotted", Backend::Xhtml11, None, &mut diag)
            .unwrap();
        assert_eq!(style.entry_start, Template::parse("<li>"));
        // untouched keys keep their built-in values
        assert_eq!(style.entry_end, Template::parse("</p>{nl}"));
    }
}
